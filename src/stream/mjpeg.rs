/// Boundary used by the camera server's `/stream_feed`
pub const DEFAULT_BOUNDARY: &str = "frame";

const HEADER_END: &[u8] = b"\r\n\r\n";

/// Extract the boundary from a `multipart/x-mixed-replace; boundary=...` content type
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').map(str::trim).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("boundary") {
            let value = value.trim().trim_matches('"');
            let value = value.strip_prefix("--").unwrap_or(value);
            (!value.is_empty()).then(|| value.to_owned())
        } else {
            None
        }
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

fn content_length(headers: &[u8]) -> Option<usize> {
    let headers = std::str::from_utf8(headers).ok()?;
    headers.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Incremental splitter for a multipart MJPEG body.
///
/// Chunks can cut anywhere, including through a boundary or a header. A part
/// is complete once its `Content-Length` bytes have arrived, or otherwise
/// once the next boundary shows up.
#[derive(Debug, Clone)]
pub struct MjpegDecoder {
    delimiter: Vec<u8>,
    buffer: Vec<u8>,
}

impl Default for MjpegDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY)
    }
}

impl MjpegDecoder {
    pub fn new(boundary: &str) -> Self {
        Self {
            delimiter: format!("--{boundary}").into_bytes(),
            buffer: Vec::new(),
        }
    }

    /// Bytes received but not yet returned as a frame
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a chunk and return every payload it completed, oldest first
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame() {
            if !frame.is_empty() {
                frames.push(frame);
            }
        }
        frames
    }

    fn next_frame(&mut self) -> Option<Vec<u8>> {
        let Some(start) = find(&self.buffer, &self.delimiter) else {
            // Keep a tail that might be the start of a split delimiter
            let keep = self.delimiter.len().saturating_sub(1).min(self.buffer.len());
            self.buffer.drain(..self.buffer.len() - keep);
            return None;
        };
        if start > 0 {
            self.buffer.drain(..start);
        }

        let headers_start = self.delimiter.len();
        let header_len = find(&self.buffer[headers_start..], HEADER_END)?;
        let body_start = headers_start + header_len + HEADER_END.len();
        let headers = &self.buffer[headers_start..headers_start + header_len];

        let body_end = match content_length(headers) {
            Some(len) if self.buffer.len() >= body_start + len => body_start + len,
            Some(_) => return None,
            None => body_start + find(&self.buffer[body_start..], &self.delimiter)?,
        };

        let mut frame = self.buffer[body_start..body_end].to_vec();
        if frame.ends_with(b"\r\n") {
            frame.truncate(frame.len() - 2);
        }
        self.buffer.drain(..body_end);
        Some(frame)
    }
}
