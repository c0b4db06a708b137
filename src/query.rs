use crate::chart::RenderOptions;

/// Parse the raw query string of a chart request into the value series
/// and render options. Unknown parameters are ignored; malformed numeric
/// entries are dropped rather than rejected.
pub fn parse_query(query: &str) -> (Vec<f64>, RenderOptions) {
    let mut values = Vec::new();
    let mut options = RenderOptions::default();

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let value = percent_decode(value);

        match key {
            "values" => values = parse_values(&value),
            "line" => options.line = value == "1",
            "fill" => options.fill = value == "1",
            "bar" => options.bar = value == "1",
            "gray" => options.gray = value == "1",
            // Unparsable or absent stays 0, which the normalizer maps
            // to the default of 100.
            "maxValue" => options.max_value = value.parse().unwrap_or(0.0),
            _ => {}
        }
    }

    (values, options)
}

/// Split a comma-separated list into finite numbers. An empty entry
/// counts as zero; anything unparsable or non-finite is dropped.
pub fn parse_values(list: &str) -> Vec<f64> {
    list.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                Some(0.0)
            } else {
                entry.parse::<f64>().ok()
            }
        })
        .filter(|v| v.is_finite())
        .collect()
}

/// Decode `%XX` escapes and `+` as space. Invalid escapes are kept
/// verbatim; the numeric parser downstream drops whatever remains
/// malformed.
fn percent_decode(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut bytes = value.bytes();

    while let Some(b) = bytes.next() {
        match b {
            b'+' => decoded.push(' '),
            b'%' => {
                let hi = bytes.next();
                let lo = bytes.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => match hex_pair(hi, lo) {
                        Some(byte) => decoded.push(byte as char),
                        None => {
                            decoded.push('%');
                            decoded.push(hi as char);
                            decoded.push(lo as char);
                        }
                    },
                    (Some(hi), None) => {
                        decoded.push('%');
                        decoded.push(hi as char);
                    }
                    _ => decoded.push('%'),
                }
            }
            _ => decoded.push(b as char),
        }
    }

    decoded
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
