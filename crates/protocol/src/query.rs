//! `application/x-www-form-urlencoded` codec for `cmd.cgi` query strings.

pub fn encode<K, V>(params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                encode_component(key.as_ref()),
                encode_component(value.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

pub fn encode_component(raw: &str) -> String {
    urlencoding::encode(raw).replace("%20", "+")
}

pub fn decode(query: &str) -> Result<Vec<(String, String)>, String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        return Ok(Vec::new());
    }
    query
        .split('&')
        .map(|pair| -> Result<(String, String), String> {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

pub fn decode_component(encoded: &str) -> Result<String, String> {
    let spaced = encoded.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|value| value.into_owned())
        .map_err(|err| format!("invalid percent-encoding in {encoded:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommandRequest, DowntimeWindow, Operation};
    use chrono::{TimeZone, Utc};

    #[test]
    fn encodes_timestamps_like_a_form() {
        let encoded = encode(&[("start_time", "03-09-2024 23:55:00")]);
        assert_eq!(encoded, "start_time=03-09-2024+23%3A55%3A00");
    }

    #[test]
    fn reserved_characters_are_escaped() {
        let encoded = encode_component("a+b&c=d/é");
        assert_eq!(encoded, "a%2Bb%26c%3Dd%2F%C3%A9");
        assert_eq!(decode_component(&encoded).unwrap(), "a+b&c=d/é");
    }

    #[test]
    fn downtime_request_survives_decoding() {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let window = DowntimeWindow::starting_at(start, 45).unwrap();
        let request =
            CommandRequest::downtime("web 01&x", Operation::DowntimeServices, window).unwrap();
        let expected: Vec<(String, String)> = request
            .params()
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        assert_eq!(decode(&request.query_string()).unwrap(), expected);
    }

    #[test]
    fn decode_handles_empty_and_bare_keys() {
        assert!(decode("").unwrap().is_empty());
        assert_eq!(
            decode("?ahas").unwrap(),
            vec![("ahas".to_string(), String::new())]
        );
    }
}
