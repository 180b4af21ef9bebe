//! Route text format: one compass name per line, no trailing newline.

use crate::engine::error::CodecError;
use crate::engine::models::Heading;

pub fn encode(route: &[Heading]) -> Vec<&'static str> {
    route.iter().map(|h| h.name()).collect()
}

pub fn decode<S: AsRef<str>>(names: &[S]) -> Result<Vec<Heading>, CodecError> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let name = name.as_ref();
            Heading::from_name(name).ok_or_else(|| CodecError::UnknownMoveName {
                index,
                name: name.to_string(),
            })
        })
        .collect()
}

pub fn format_route(route: &[Heading]) -> String {
    encode(route).join("\n")
}

/// Reads route text. Surrounding whitespace is trimmed and blank lines are
/// ignored, so a trailing newline or CRLF endings are accepted.
pub fn parse_route(text: &str) -> Result<Vec<Heading>, CodecError> {
    let names: Vec<&str> = text.lines().map(str::trim).filter(|line| !line.is_empty()).collect();
    decode(&names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_names() {
        assert_eq!(
            encode(&[Heading::N, Heading::NE, Heading::SE, Heading::S, Heading::SW, Heading::NW]),
            vec!["N", "NE", "SE", "S", "SW", "NW"]
        );
        assert!(encode(&[]).is_empty());
    }

    #[test]
    fn test_decode_inverts_encode() {
        // Every ordered pair plus a longer mixed route.
        for a in Heading::ALL {
            for b in Heading::ALL {
                let route = vec![a, b];
                assert_eq!(decode(&encode(&route)).unwrap(), route);
            }
        }
        let long = vec![Heading::SE, Heading::SE, Heading::NE, Heading::NW, Heading::S, Heading::SW, Heading::N];
        assert_eq!(decode(&encode(&long)).unwrap(), long);
    }

    #[test]
    fn test_decode_unknown_name() {
        let err = decode(&["N", "E", "S"]).unwrap_err();
        assert_eq!(err, CodecError::UnknownMoveName { index: 1, name: "E".to_string() });

        // Names are case sensitive.
        assert!(decode(&["ne"]).is_err());
    }

    #[test]
    fn test_format_route_bytes() {
        let text = format_route(&[Heading::SE, Heading::NE, Heading::S]);
        assert_eq!(text, "SE\nNE\nS");
        assert_eq!(format_route(&[]), "");
    }

    #[test]
    fn test_parse_route_tolerates_whitespace() {
        assert_eq!(
            parse_route("SE\r\nNE\n\n  S  \n").unwrap(),
            vec![Heading::SE, Heading::NE, Heading::S]
        );
        assert!(parse_route("").unwrap().is_empty());

        let err = parse_route("N\nNNE\n").unwrap_err();
        assert_eq!(err, CodecError::UnknownMoveName { index: 1, name: "NNE".to_string() });
    }
}
