//! Parse raw header lines collected by libcurl.

/// Turns raw header lines into (name, value) pairs for the final response.
///
/// libcurl reports the headers of every redirect hop; a status line
/// (`HTTP/...`) starts a new response, so earlier pairs are discarded.
pub(crate) fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_value_pairs() {
        let lines = [
            "HTTP/1.1 200 OK".to_string(),
            "Content-Type: text/html; charset=utf-8".to_string(),
            "Content-Length: 12345".to_string(),
            String::new(),
        ];
        let h = parse_header_lines(&lines);
        assert_eq!(h.len(), 2);
        assert_eq!(h[0].0, "Content-Type");
        assert_eq!(h[0].1, "text/html; charset=utf-8");
    }

    #[test]
    fn keeps_only_final_hop_after_redirect() {
        let lines = [
            "HTTP/1.1 301 Moved Permanently".to_string(),
            "Location: https://www.acme-demo.io/".to_string(),
            "Content-Type: text/plain".to_string(),
            "".to_string(),
            "HTTP/2 200".to_string(),
            "content-type: text/html".to_string(),
        ];
        let h = parse_header_lines(&lines);
        assert_eq!(h, vec![("content-type".to_string(), "text/html".to_string())]);
    }
}
