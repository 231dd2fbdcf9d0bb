//! Title encoding for page links and feed hrefs.

use crate::error::ScrapeError;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in a page link; everything else is percent-encoded
const TITLE_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/')
    .remove(b':');

/// Percent-encode a title for use in a URL path
pub fn encode_title(title: &str) -> String {
    utf8_percent_encode(title, TITLE_ESCAPE).to_string()
}

/// Decode a percent-encoded title taken from an href
pub fn decode_title(escaped: &str) -> Result<String, ScrapeError> {
    percent_decode_str(escaped)
        .decode_utf8()
        .map(|title| title.into_owned())
        .map_err(|_| ScrapeError::InvalidTitleEncoding(escaped.to_string()))
}

/// Canonical wiki page URL for a title
pub fn page_link(wiki_base: &str, title: &str) -> String {
    format!("{}{}", wiki_base, encode_title(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://commons.wikimedia.org/wiki/";

    #[test]
    fn test_page_link() {
        assert_eq!(
            page_link(BASE, "File:Example.jpg"),
            "https://commons.wikimedia.org/wiki/File:Example.jpg"
        );
        assert_eq!(
            page_link(BASE, "File:Tour Eiffel (1889).jpg"),
            "https://commons.wikimedia.org/wiki/File:Tour%20Eiffel%20%281889%29.jpg"
        );
    }

    #[test]
    fn test_non_ascii_titles() -> anyhow::Result<()> {
        let title = "File:Château_de_Chambord.jpg";
        let encoded = encode_title(title);
        assert_eq!(encoded, "File:Ch%C3%A2teau_de_Chambord.jpg");
        assert_eq!(decode_title(&encoded)?, title);
        Ok(())
    }

    #[test]
    fn test_decode_href() -> anyhow::Result<()> {
        assert_eq!(
            decode_title("File:Sunset_%26_Sea%2C_2020.jpg")?,
            "File:Sunset_&_Sea,_2020.jpg"
        );
        Ok(())
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        assert!(matches!(
            decode_title("File:%FF.jpg"),
            Err(ScrapeError::InvalidTitleEncoding(_))
        ));
    }
}
