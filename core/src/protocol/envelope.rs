//! XML envelopes the client wraps around upload results.
//!
//! The device's `/post` answer is passed through inside a `success`
//! envelope; a missing target folder is reported without contacting the
//! device, inside an `error` envelope. The message is inserted verbatim.

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n";

pub fn success_xml(message: &str) -> String {
    format!("{XML_DECLARATION}<success><message>{message}</message></success>")
}

pub fn error_xml(message: &str) -> String {
    format!("{XML_DECLARATION}<error><message>{message}</message></error>")
}
