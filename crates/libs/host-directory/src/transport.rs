use ureq::ErrorKind;

/// One line describing why a directory request never got a status back.
pub(crate) fn summarize_transport_error(transport: &ureq::Transport) -> String {
    let category = match transport.kind() {
        ErrorKind::ConnectionFailed => "directory unreachable",
        ErrorKind::Dns => "directory host not resolved",
        ErrorKind::Io => "connection to directory lost",
        ErrorKind::InvalidUrl | ErrorKind::UnknownScheme => "bad directory url",
        ErrorKind::BadStatus | ErrorKind::BadHeader => "malformed directory response",
        _ => "directory request failed",
    };

    match transport.message().map(str::trim).filter(|message| !message.is_empty()) {
        Some(message) => format!("{category}: {message}"),
        None => category.to_string(),
    }
}

/// Keep logged response bodies short.
pub(crate) fn truncate_body(mut body: String, limit: usize) -> String {
    if body.len() > limit {
        let mut cut = limit;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
