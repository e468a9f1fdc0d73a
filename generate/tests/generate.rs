use generate::{GenerateError, Generator};
use mockito::Matcher;
use models::{
    Endpoint, FirstEndpointPicker, GenerationOverrides, GenerationParameters, ModelConfig,
};
use std::io::Write;
use tokio_util::sync::CancellationToken;

fn tgi_endpoint(url: String) -> Endpoint {
    Endpoint::TextGeneration {
        url,
        authorization: "Bearer test-token".to_string(),
        weight: 1,
    }
}

fn sagemaker_endpoint(url: String) -> Endpoint {
    Endpoint::Sagemaker {
        url,
        access_key: "AKIAEXAMPLE".to_string(),
        secret_key: "test-secret".to_string(),
        session_token: Some("test-session-token".to_string()),
        region: "us-east-1".to_string(),
        weight: 1,
    }
}

fn model(endpoint: Endpoint) -> ModelConfig {
    ModelConfig {
        dataset_name: None,
        dataset_url: None,
        description: None,
        display_name: None,
        endpoints: vec![endpoint],
        id: "test/model".to_string(),
        model_url: None,
        name: "test/model".to_string(),
        parameters: GenerationParameters {
            max_new_tokens: 1024,
            repetition_penalty: None,
            stop: vec!["User:".to_string()],
            temperature: 0.9,
            top_k: None,
            top_p: None,
            truncate: 1000,
        },
        preprompt: None,
        prompt_examples: Vec::new(),
        website_url: None,
    }
}

fn generator(endpoint: Endpoint) -> Generator {
    Generator::new(model(endpoint)).with_picker(Box::new(FirstEndpointPicker))
}

#[tokio::test]
async fn generates_and_cleans_text_over_bearer_path() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/generate")
        .match_header("authorization", "Bearer test-token")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "inputs": "Translate: hi ",
            "return_full_text": false,
            "temperature": 0.9,
        })))
        .with_status(200)
        .with_body(r#"[{"generated_text": "<|startoftext|>Translate: hi Bonjour</s>"}]"#)
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let text = generator
        .generate("Translate: hi ", None, CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "Bonjour");
}

#[tokio::test]
async fn overrides_replace_defaults_in_request_body() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::AllOf(vec![
            Matcher::PartialJson(serde_json::json!({
                "temperature": 0.1,
                "max_new_tokens": 30,
                "stop": ["STOP"],
                "return_full_text": false,
            })),
            // forcing return_full_text off is not overridable
            Matcher::Regex(r#""return_full_text":false"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"[{"generated_text": "the answer STOP"}]"#)
        .create_async()
        .await;

    let overrides = GenerationOverrides {
        max_new_tokens: Some(30),
        stop: Some(vec!["STOP".to_string()]),
        temperature: Some(0.1),
        ..Default::default()
    };

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let text = generator
        .generate("summarize", Some(&overrides), CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    // the overridden stop list drives trimming
    assert_eq!(text, "the answer");
}

#[tokio::test]
async fn sagemaker_endpoint_goes_through_signing_path() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("POST", "/endpoints/test/invocations")
        .match_header(
            "authorization",
            Matcher::Regex(
                r"^AWS4-HMAC-SHA256 Credential=AKIAEXAMPLE/\d{8}/us-east-1/sagemaker/aws4_request"
                    .to_string(),
            ),
        )
        .match_header("x-amz-date", Matcher::Any)
        .match_header("x-amz-security-token", "test-session-token")
        .with_status(200)
        .with_body(r#"[{"generated_text": "signed response"}]"#)
        .create_async()
        .await;

    let url = format!("{}/endpoints/test/invocations", server.url());
    let generator = generator(sagemaker_endpoint(url));
    let text = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(text, "signed response");
}

#[tokio::test]
async fn non_success_status_surfaces_endpoint_error_with_body() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/generate")
        .with_status(500)
        .with_body("server overloaded")
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let err = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        GenerateError::Endpoint { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("server overloaded"));
        }
        other => panic!("expected Endpoint error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_body_surfaces_empty_response_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("")
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let err = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::EmptyResponse));
}

#[tokio::test]
async fn malformed_json_surfaces_malformed_response_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("not json at all")
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let err = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::MalformedResponse(_)));
}

#[tokio::test]
async fn empty_response_array_surfaces_malformed_response_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let err = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::MalformedResponse(_)));
}

#[tokio::test]
async fn response_split_across_chunks_decodes_correctly() {
    let mut server = mockito::Server::new_async().await;

    // Split the body inside the two-byte "é" (0xC3 0xA9).
    let body = r#"[{"generated_text": "café au lait"}]"#.as_bytes();
    let split = body.iter().position(|&b| b == 0xC3).unwrap() + 1;
    let (head, tail) = (body[..split].to_vec(), body[split..].to_vec());

    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_chunked_body(move |w| {
            w.write_all(&head)?;
            w.flush()?;
            w.write_all(&tail)
        })
        .create_async()
        .await;

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let text = generator
        .generate("order", None, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(text, "café au lait");
}

#[tokio::test]
async fn cancelled_token_surfaces_cancelled_error() {
    let mut server = mockito::Server::new_async().await;

    server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(r#"[{"generated_text": "too late"}]"#)
        .create_async()
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let generator = generator(tgi_endpoint(format!("{}/generate", server.url())));
    let err = generator.generate("hello", None, cancel).await.unwrap_err();

    assert!(matches!(err, GenerateError::Cancelled));
}

#[tokio::test]
async fn model_without_endpoints_fails_before_sending() {
    let mut config = model(tgi_endpoint("https://unused.test".to_string()));
    config.endpoints.clear();

    let generator = Generator::new(config).with_picker(Box::new(FirstEndpointPicker));
    let err = generator
        .generate("hello", None, CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::NoEndpoint));
}
