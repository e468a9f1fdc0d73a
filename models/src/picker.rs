use rand::Rng;

use crate::Endpoint;

/// Strategy for choosing which endpoint candidate a request goes to.
/// Selection is stateless; nothing is remembered between calls.
pub trait EndpointPicker: Send + Sync {
    fn pick<'a>(&self, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint>;
}

/// Weighted random choice among the candidates, matching how traffic is
/// spread across replicas in production configs.
pub struct RandomEndpointPicker;

impl EndpointPicker for RandomEndpointPicker {
    fn pick<'a>(&self, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint> {
        let total: u32 = endpoints.iter().map(Endpoint::weight).sum();
        if total == 0 {
            return endpoints.first();
        }

        let mut remaining = rand::thread_rng().gen_range(0..total);
        for endpoint in endpoints {
            let weight = endpoint.weight();
            if remaining < weight {
                return Some(endpoint);
            }
            remaining -= weight;
        }

        None
    }
}

/// Always picks the first candidate. Used by tests that need determinism.
pub struct FirstEndpointPicker;

impl EndpointPicker for FirstEndpointPicker {
    fn pick<'a>(&self, endpoints: &'a [Endpoint]) -> Option<&'a Endpoint> {
        endpoints.first()
    }
}
