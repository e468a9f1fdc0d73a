use std::mem;

/// Incremental UTF-8 decoder for a streamed response body.
///
/// A chunk boundary can land in the middle of a multi-byte character, so the
/// decoder carries the incomplete trailing sequence over to the next chunk
/// instead of decoding each chunk in isolation. Invalid sequences decode
/// lossily to U+FFFD rather than failing the stream.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    pending: Vec<u8>,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `chunk` into `out`, holding back an incomplete trailing
    /// multi-byte sequence until the next call.
    pub fn decode(&mut self, chunk: &[u8], out: &mut String) {
        let carried;
        let mut rest: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            let mut buf = mem::take(&mut self.pending);
            buf.extend_from_slice(chunk);
            carried = buf;
            &carried
        };

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    return;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    if let Ok(valid) = std::str::from_utf8(valid) {
                        out.push_str(valid);
                    }
                    match err.error_len() {
                        // Incomplete sequence at the end of the chunk: the
                        // next chunk may complete it.
                        None => {
                            self.pending = after.to_vec();
                            return;
                        }
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[len..];
                        }
                    }
                }
            }
        }
    }

    /// Flushes any bytes still held back once the stream has ended. A
    /// sequence that never completed decodes as a single replacement
    /// character.
    pub fn finish(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}
