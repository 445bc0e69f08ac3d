//! Multi-part request assembly and the single generation call.

use std::time::Duration;

use tracing::info;

use adscope_core::{RemoteFileService, RemoteHandle, RequestPart, Result};

/// Fixed analysis instruction. Not user-editable; the front end only
/// supplies the video.
pub const ANALYSIS_PROMPT: &str = "You are a marketing insights analyst reviewing the uploaded \
advertising video from my social media page. Describe the key elements and actions in the video. \
Provide a detailed report in 100-200 words, including insights on the video's effectiveness, \
audience engagement, and any patterns observed. Offer suggestions for improvement and \
optimization. Maintain a formal and professional tone.";

/// Build the ordered request: the prompt first, then one file part per
/// handle in artifact creation order.
pub fn build_request(prompt: &str, handles: &[RemoteHandle]) -> Vec<RequestPart> {
    let mut parts = Vec::with_capacity(handles.len() + 1);
    parts.push(RequestPart::Text(prompt.to_string()));
    parts.extend(handles.iter().cloned().map(RequestPart::File));
    parts
}

/// Assemble and send one generation request with the given deadline.
///
/// Mutates nothing, locally or remotely; the only side effect is the remote
/// call itself.
pub async fn build_and_send(
    prompt: &str,
    handles: &[RemoteHandle],
    service: &dyn RemoteFileService,
    timeout: Duration,
) -> Result<String> {
    let parts = build_request(prompt, handles);
    info!("sending generation request with {} parts", parts.len());
    service.generate(&parts, timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(n: u32) -> RemoteHandle {
        RemoteHandle {
            name: format!("files/h{n}"),
            uri: format!("uri-{n}"),
            mime_type: "image/jpeg".into(),
        }
    }

    #[test]
    fn prompt_leads_and_handles_follow_in_order() {
        let handles: Vec<RemoteHandle> = (0..4).map(handle).collect();
        let parts = build_request(ANALYSIS_PROMPT, &handles);

        assert_eq!(parts.len(), handles.len() + 1);
        assert!(matches!(&parts[0], RequestPart::Text(t) if t == ANALYSIS_PROMPT));
        for (i, part) in parts[1..].iter().enumerate() {
            assert!(matches!(part, RequestPart::File(h) if h.uri == format!("uri-{i}")));
        }
    }

    #[test]
    fn empty_batch_still_carries_the_prompt() {
        let parts = build_request(ANALYSIS_PROMPT, &[]);
        assert_eq!(parts.len(), 1);
        assert!(matches!(&parts[0], RequestPart::Text(_)));
    }
}
