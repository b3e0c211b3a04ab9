use crate::error::MalformedLinkError;

const BREWERY_SEGMENT: usize = 3;
const BEER_SEGMENT: usize = 4;

/// Split a profile link like `/beer/profile/<brewery>/<beer>/` into
/// `(brewery_id, beer_id)`.
pub fn decompose(link: &str) -> Result<(&str, &str), MalformedLinkError> {
    let segments: Vec<&str> = link.split('/').collect();
    if segments.len() <= BEER_SEGMENT {
        return Err(malformed(link, "too few path segments"));
    }
    let brewery = segments[BREWERY_SEGMENT];
    let beer = segments[BEER_SEGMENT];
    if brewery.is_empty() || beer.is_empty() {
        return Err(malformed(link, "empty id segment"));
    }
    Ok((brewery, beer))
}

/// Same as [`decompose`], with both ids parsed as integers.
pub fn parse_ids(link: &str) -> Result<(i64, i64), MalformedLinkError> {
    let (brewery, beer) = decompose(link)?;
    let brew_id = brewery
        .parse()
        .map_err(|_| malformed(link, "brewery id is not an integer"))?;
    let beer_id = beer
        .parse()
        .map_err(|_| malformed(link, "beer id is not an integer"))?;
    Ok((brew_id, beer_id))
}

fn malformed(link: &str, reason: &'static str) -> MalformedLinkError {
    MalformedLinkError {
        link: link.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_link() {
        assert_eq!(decompose("/beer/profile/123/456/"), Ok(("123", "456")));
        assert_eq!(parse_ids("/beer/profile/123/456/"), Ok((123, 456)));
    }

    #[test]
    fn no_trailing_slash() {
        assert_eq!(parse_ids("/beer/profile/29/65"), Ok((29, 65)));
    }

    #[test]
    fn too_short() {
        let err = decompose("/beer/profile/123").unwrap_err();
        assert_eq!(err.reason, "too few path segments");
        assert_eq!(err.link, "/beer/profile/123");
    }

    #[test]
    fn empty_segment() {
        assert!(decompose("/beer/profile//456/").is_err());
        assert!(decompose("/beer/profile/123//").is_err());
    }

    #[test]
    fn non_numeric_ids() {
        let err = parse_ids("/beer/profile/abc/456/").unwrap_err();
        assert_eq!(err.reason, "brewery id is not an integer");
        let err = parse_ids("/beer/profile/123/x1/").unwrap_err();
        assert_eq!(err.reason, "beer id is not an integer");
    }
}
