//! Integration tests for extraction against suffix list fixtures.

use hostsplit::{
    Error, ExtractOptions, Extractor, ExtractorConfig, FetchResponse, Fetcher, SuffixListSource,
    SuffixLists,
};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

fn full_list() -> String {
    std::fs::read_to_string(fixture("public_suffix_list.dat")).unwrap()
}

/// Serves a fixed sequence of list bodies.
struct SequenceFetcher {
    bodies: Mutex<Vec<String>>,
}

impl SequenceFetcher {
    fn new(mut bodies: Vec<String>) -> Self {
        bodies.reverse();
        Self {
            bodies: Mutex::new(bodies),
        }
    }
}

impl Fetcher for SequenceFetcher {
    fn fetch(&self, _url: &str, _etag: Option<&str>) -> hostsplit::Result<FetchResponse> {
        match self.bodies.lock().pop() {
            Some(body) => Ok(FetchResponse::Body {
                data: body.into_bytes(),
                etag: None,
            }),
            None => Ok(FetchResponse::NotModified),
        }
    }
}

#[test]
fn test_suffix_list_sections() {
    let lists = SuffixLists::parse(&full_list());
    assert!(lists.icann.contains(&"co.uk".to_string()));
    assert!(lists.icann.contains(&"!www.ck".to_string()));
    assert!(lists.icann.contains(&"公司.cn".to_string()));
    assert_eq!(
        lists.private,
        vec!["blogspot.com", "blogspot.co.uk", "github.io", "s3.amazonaws.com"]
    );

    let mini = std::fs::read(fixture("mini_public_suffix_list.dat")).unwrap();
    let mini = SuffixLists::from_bytes(&mini).unwrap();
    assert_eq!(
        mini.icann,
        vec!["ac", "com.ac", "edu.ac", "gov.ac", "net.ac", "mil.ac", "org.ac", "*.ck", "!www.ck"]
    );
    assert!(mini.private.is_empty());
}

#[test]
fn test_missing_list_file() {
    let result = Extractor::from_file(&fixture("public_suffix_list.dat.noexist"), false);
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_update_custom_list_is_rejected() {
    let extractor = Extractor::from_file(&fixture("mini_public_suffix_list.dat"), false).unwrap();
    assert!(matches!(extractor.update(), Err(Error::UpdateUnsupported)));
}

#[test]
fn test_end_to_end_urls() {
    let extractor = Extractor::from_file(&fixture("public_suffix_list.dat"), false).unwrap();

    let r = extractor.extract("HTTPS://user@sub.example.co.uk:443/path");
    assert_eq!(r.scheme, "https");
    assert_eq!(r.user_info, "user");
    assert_eq!(r.sub_domain, "sub");
    assert_eq!(r.domain, "example");
    assert_eq!(r.suffix, "co.uk");
    assert_eq!(r.port, "443");
    assert!(!r.is_ipv4);

    let r = extractor.extract("127.0.0.1");
    assert!(r.is_ipv4);
    assert_eq!(r.domain, "");
    assert_eq!(r.suffix, "");

    let r = extractor.extract("//a.b.city.kawasaki.jp");
    assert_eq!(r.scheme, "");
    assert_eq!(r.sub_domain, "a.b");
    assert_eq!(r.domain, "city");
    assert_eq!(r.suffix, "kawasaki.jp");

    let r = extractor.extract("mailto:someone@example.com");
    assert_eq!(r.scheme, "");
    assert_eq!(r.user_info, "mailto:someone");
    assert_eq!(r.registered_domain, "example.com");
}

#[test]
fn test_internationalised_hosts() {
    let extractor = Extractor::from_file(&fixture("public_suffix_list.dat"), false).unwrap();

    let r = extractor.extract("https://例子.公司.cn/");
    assert_eq!(r.domain, "例子");
    assert_eq!(r.suffix, "公司.cn");

    let r = extractor.extract("https://xn--fsqu00a.xn--55qx5d.cn/");
    assert_eq!(r.domain, "xn--fsqu00a");
    assert_eq!(r.suffix, "xn--55qx5d.cn");

    let opts = ExtractOptions::default().to_punycode(true);
    let r = extractor.extract_with("http://www.例子\u{3002}中国", &opts);
    assert_eq!(r.sub_domain, "www");
    assert_eq!(r.domain, "xn--fsqu00a");
    assert_eq!(r.suffix, "xn--fiqs8s");
}

#[test]
fn test_private_domains() {
    let icann = Extractor::from_file(&fixture("public_suffix_list.dat"), false).unwrap();
    let all = Extractor::from_file(&fixture("public_suffix_list.dat"), true).unwrap();

    let r = icann.extract("https://user.github.io/repo");
    assert_eq!(r.domain, "github");
    assert_eq!(r.suffix, "io");

    let r = all.extract("https://user.github.io/repo");
    assert_eq!(r.domain, "user");
    assert_eq!(r.suffix, "github.io");

    let r = all.extract("bucket.s3.amazonaws.com");
    assert_eq!(r.domain, "bucket");
    assert_eq!(r.suffix, "s3.amazonaws.com");
    assert!(all.rule_count() > icann.rule_count());
}

#[test]
fn test_remote_update_swaps_trie() {
    let dir = tempfile::tempdir().unwrap();
    let fetcher = SequenceFetcher::new(vec!["com\n".to_string(), full_list()]);
    let config = ExtractorConfig::new(SuffixListSource::remote_url(
        "http://psl.test/list.dat",
        dir.path(),
    ))
    .with_private(true);

    let extractor = Extractor::with_fetcher(config, Box::new(fetcher)).unwrap();
    assert!(extractor.is_refreshable());
    assert!(extractor.last_updated().is_some());
    assert_eq!(extractor.extract("foo.blogspot.com").domain, "blogspot");

    assert!(extractor.update().unwrap());
    assert_eq!(extractor.generation(), 1);
    assert_eq!(extractor.extract("foo.blogspot.com").domain, "foo");

    // fetcher is exhausted and reports 304
    assert!(!extractor.update().unwrap());
    assert_eq!(extractor.generation(), 1);
}

#[test]
fn test_concurrent_reads_during_update() {
    let dir = tempfile::tempdir().unwrap();
    let bodies = (0..20)
        .map(|i| if i % 2 == 0 { full_list() } else { "com\n".to_string() })
        .collect();
    let config = ExtractorConfig::new(SuffixListSource::remote_url(
        "http://psl.test/list.dat",
        dir.path(),
    ))
    .with_private(true);
    let extractor =
        Arc::new(Extractor::with_fetcher(config, Box::new(SequenceFetcher::new(bodies))).unwrap());

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let extractor = Arc::clone(&extractor);
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let r = extractor.extract("a.foo.blogspot.com");
                    // either the full list or the single-rule list, never a mix
                    let consistent = (r.domain == "foo" && r.suffix == "blogspot.com")
                        || (r.domain == "blogspot" && r.suffix == "com");
                    assert!(consistent, "inconsistent result {:?}", r);
                }
            })
        })
        .collect();

    while extractor.update().unwrap() {}

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(extractor.generation(), 19);
}
