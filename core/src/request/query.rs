use std::collections::HashMap;

/// Decode a raw query string into a parameter map.
///
/// Pairs are split at the first `=` only, since `DataInputs` values carry
/// `=` themselves. Keys are lower-cased; KVP keys are case-insensitive.
pub fn parse_query_string(query: &str) -> HashMap<String, String> {
    query
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Some((decode(key)?.to_lowercase(), decode(value)?))
        })
        .collect()
}

fn decode(raw: &str) -> Option<String> {
    let plus_as_space = raw.replace('+', " ");
    match urlencoding::decode(&plus_as_space) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(e) => {
            log::warn!("Skipping query component '{}': {}", raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_string_simple() {
        let result = parse_query_string("service=WPS&Request=Execute");
        assert_eq!(result.get("service"), Some(&"WPS".to_string()));
        assert_eq!(result.get("request"), Some(&"Execute".to_string()));
    }

    #[test]
    fn test_parse_query_string_keeps_inner_equals() {
        let result = parse_query_string("DataInputs=a%3D1%40uom%3Dm;b=2");
        assert_eq!(result.get("datainputs"), Some(&"a=1@uom=m;b=2".to_string()));
    }

    #[test]
    fn test_parse_query_string_encoded() {
        let result = parse_query_string("?identifier=my+process&x=New%20York");
        assert_eq!(result.get("identifier"), Some(&"my process".to_string()));
        assert_eq!(result.get("x"), Some(&"New York".to_string()));
    }

    #[test]
    fn test_parse_query_string_empty() {
        assert!(parse_query_string("").is_empty());
    }

    #[test]
    fn test_parse_query_string_flag_without_value() {
        let result = parse_query_string("status&lineage=true");
        assert_eq!(result.get("status"), Some(&String::new()));
    }

    #[test]
    fn test_parse_query_string_invalid_utf8_is_skipped() {
        let result = parse_query_string("a=%FF&b=ok");
        assert!(result.get("a").is_none());
        assert_eq!(result.get("b"), Some(&"ok".to_string()));
    }
}
