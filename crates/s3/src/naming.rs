//! Bucket naming and website endpoint helpers

/// Length of the random suffix appended to auto-named buckets
pub const SUFFIX_LEN: usize = 7;

/// Regions whose website endpoints use `s3-website-<region>` rather than
/// `s3-website.<region>`.
const DASH_WEBSITE_REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "eu-west-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Physical bucket name for a logical name: `<name>-<7 hex chars>`.
pub fn autoname(name: &str) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{name}-{}", &suffix[..SUFFIX_LEN])
}

/// Website hosting domain of a region
pub fn website_domain(region: &str) -> String {
    if DASH_WEBSITE_REGIONS.contains(&region) {
        format!("s3-website-{region}.amazonaws.com")
    } else {
        format!("s3-website.{region}.amazonaws.com")
    }
}

/// Website endpoint of a bucket, without scheme
pub fn website_endpoint(bucket: &str, region: &str) -> String {
    format!("{bucket}.{}", website_domain(region))
}

/// ARN of a bucket
pub fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{bucket}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoname_shape() {
        let name = autoname("static-website");
        let suffix = name.strip_prefix("static-website-").unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_autoname_is_random() {
        assert_ne!(autoname("site"), autoname("site"));
    }

    #[test]
    fn test_website_endpoint_dash_region() {
        assert_eq!(
            website_endpoint("static-website-abc1234", "us-west-2"),
            "static-website-abc1234.s3-website-us-west-2.amazonaws.com"
        );
    }

    #[test]
    fn test_website_endpoint_dot_region() {
        assert_eq!(
            website_endpoint("docs", "eu-central-1"),
            "docs.s3-website.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn test_bucket_arn() {
        assert_eq!(bucket_arn("docs"), "arn:aws:s3:::docs");
    }
}
