//! Request path to bucket/key resolution.
//!
//! The first path segment names the bucket and everything after it is the
//! object key. An optional prefix is injected in front of the path before it
//! is split, so `PREFIX_PATH=media` turns `/clips/a.mp4` into bucket `media`,
//! key `clips/a.mp4`.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// Bucket and key addressed by a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    pub bucket: String,
    pub key: String,
}

impl ResolvedPath {
    /// Keys ending in `/` name directories, which are never served
    pub fn is_directory(&self) -> bool {
        self.key.ends_with('/')
    }
}

/// Rewrite `path` as `/<prefix>/<path>` when a non-empty prefix is configured
pub fn apply_prefix<'a>(path: &'a str, prefix: Option<&str>) -> Cow<'a, str> {
    match prefix.filter(|p| !p.is_empty()) {
        Some(prefix) => {
            let prefix = prefix.trim_matches('/');
            let rest = path.strip_prefix('/').unwrap_or(path);
            Cow::Owned(format!("/{prefix}/{rest}"))
        }
        None => Cow::Borrowed(path),
    }
}

/// Split on the first `/` after a single leading slash
pub fn split_bucket_key(path: &str) -> (&str, &str) {
    let path = path.strip_prefix('/').unwrap_or(path);
    path.split_once('/').unwrap_or((path, ""))
}

/// Resolve a decoded request path to a bucket and key
pub fn resolve(raw_path: &str, prefix: Option<&str>) -> ResolvedPath {
    let path = apply_prefix(raw_path, prefix);
    let (bucket, key) = split_bucket_key(&path);

    ResolvedPath {
        bucket: bucket.to_string(),
        key: key.to_string(),
    }
}

/// Percent-decode a URI path. Invalid UTF-8 decodes lossily.
pub fn decode(raw_path: &str) -> Cow<'_, str> {
    percent_decode_str(raw_path).decode_utf8_lossy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pair(resolved: &ResolvedPath) -> (&str, &str) {
        (resolved.bucket.as_str(), resolved.key.as_str())
    }

    #[test]
    fn splits_bucket_and_key() {
        let resolved = resolve("/mybucket/folder/file.jpg", None);
        assert_eq!(pair(&resolved), ("mybucket", "folder/file.jpg"));
    }

    #[test]
    fn bucket_only() {
        assert_eq!(pair(&resolve("/mybucket", None)), ("mybucket", ""));
        assert_eq!(pair(&resolve("/mybucket/", None)), ("mybucket", ""));
    }

    #[test]
    fn root_is_empty() {
        assert_eq!(pair(&resolve("/", None)), ("", ""));
        assert_eq!(pair(&resolve("", None)), ("", ""));
    }

    #[test]
    fn prefix_becomes_bucket() {
        let resolved = resolve("/folder/file.jpg", Some("mybucket"));
        assert_eq!(pair(&resolved), ("mybucket", "folder/file.jpg"));

        let resolved = resolve("/file.jpg", Some("/mybucket/"));
        assert_eq!(pair(&resolved), ("mybucket", "file.jpg"));
    }

    #[test]
    fn multi_segment_prefix_extends_key() {
        let resolved = resolve("/file.jpg", Some("mybucket/images"));
        assert_eq!(pair(&resolved), ("mybucket", "images/file.jpg"));
    }

    #[test]
    fn inner_double_slashes_survive() {
        assert_eq!(apply_prefix("//img.jpg", Some("bucket")), "/bucket//img.jpg");
        assert_eq!(pair(&resolve("//img.jpg", Some("bucket"))), ("bucket", "/img.jpg"));
    }

    #[test]
    fn empty_prefix_borrows() {
        assert!(matches!(apply_prefix("/a/b", Some("")), Cow::Borrowed("/a/b")));
        assert!(matches!(apply_prefix("/a/b", None), Cow::Borrowed("/a/b")));
    }

    #[test]
    fn trailing_slash_is_directory() {
        assert!(resolve("/mybucket/dir/", None).is_directory());
        assert!(!resolve("/mybucket/dir/file", None).is_directory());
    }

    #[test]
    fn decodes_escapes() {
        assert_eq!(decode("/media/my%20clip.mp4"), "/media/my clip.mp4");
        assert_eq!(decode("/media/%E2%9C%93.txt"), "/media/\u{2713}.txt");
        assert_eq!(decode("/media/%FF.bin"), "/media/\u{FFFD}.bin");
    }

    proptest! {
        #[test]
        fn roundtrips_without_prefix(bucket in "[a-z0-9.-]{1,20}", key in "[a-zA-Z0-9_./-]{0,40}") {
            prop_assume!(!key.starts_with('/'));
            let resolved = resolve(&format!("/{bucket}/{key}"), Some(""));
            prop_assert_eq!(resolved.bucket, bucket);
            prop_assert_eq!(resolved.key, key);
        }

        #[test]
        fn prefix_first_segment_is_bucket(prefix in "/?[a-z0-9-]{1,10}(/[a-z0-9-]{1,10}){0,2}/?", path in "(/[a-zA-Z0-9_.-]{0,12}){0,4}") {
            let resolved = resolve(&path, Some(&prefix));
            let expected = prefix.trim_matches('/').split('/').next().unwrap_or_default();
            prop_assert_eq!(resolved.bucket.as_str(), expected);
        }

        #[test]
        fn empty_prefix_is_noop(path in "(/[a-zA-Z0-9_.-]{0,12}){0,4}") {
            let applied = apply_prefix(&path, Some(""));
            prop_assert_eq!(applied.as_ref(), path.as_str());
        }
    }
}
