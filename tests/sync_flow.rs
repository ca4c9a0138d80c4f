//! End-to-end sync runs against an in-memory platform.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use igsync::api::{Collection, CollectionId, Credentials, FeedPage, RemotePlatform, Session};
use igsync::download::{
    sync_collections, CollectionSelection, DelayPolicy, MediaFetcher, RunReport, SyncContext,
};
use igsync::error::{Error, Result};
use igsync::fs::{ContentCache, StoreLayout};
use igsync::media::{shortcode_for, MediaRecord, MediaVersion, Post};

/// Feed pages keyed by collection id. A `None` page fails with a transport error.
#[derive(Default)]
struct FakePlatform {
    collections: Vec<Collection>,
    pages: HashMap<String, Vec<Option<Vec<Post>>>>,
    fetches: Mutex<Vec<String>>,
}

impl FakePlatform {
    fn with_collection(mut self, id: &str, name: &str, pages: Vec<Option<Vec<Post>>>) -> Self {
        self.collections.push(Collection::new(id, name));
        self.pages.insert(id.to_string(), pages);
        self
    }

    fn fetched_collections(&self) -> HashSet<String> {
        self.fetches.lock().unwrap().iter().cloned().collect()
    }
}

#[async_trait]
impl RemotePlatform for FakePlatform {
    async fn login(&self, credentials: &Credentials) -> Result<Session> {
        Ok(Session::new(credentials.username.clone(), None, credentials.secret.clone()))
    }

    async fn list_collections(&self, _session: &Session) -> Result<Vec<Collection>> {
        Ok(self.collections.clone())
    }

    async fn fetch_collection_page(
        &self,
        _session: &Session,
        collection: &CollectionId,
        cursor: Option<&str>,
    ) -> Result<FeedPage> {
        self.fetches.lock().unwrap().push(collection.0.clone());

        let pages = self
            .pages
            .get(&collection.0)
            .ok_or_else(|| Error::Transport(format!("unknown collection {}", collection)))?;
        let index: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);

        let items = pages[index]
            .clone()
            .ok_or_else(|| Error::Transport("connection reset".into()))?;
        let next_cursor = (index + 1 < pages.len()).then(|| (index + 1).to_string());

        Ok(FeedPage { items, next_cursor })
    }
}

/// Writes the URL as the file body. URLs containing "broken" fail.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaFetcher for CountingFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if url.contains("broken") {
            return Err(Error::Download(format!("HTTP 404 for {}", url)));
        }
        tokio::fs::write(dest, url.as_bytes()).await?;
        Ok(url.len() as u64)
    }
}

fn image(id: u64) -> Post {
    Post::new(
        id,
        "owner",
        MediaRecord::Image {
            versions: vec![MediaVersion::new(format!("https://cdn.example/{}.jpg", id), 1080, 1080)],
        },
    )
}

fn video(id: u64) -> Post {
    Post::new(
        id,
        "owner",
        MediaRecord::Video {
            versions: vec![MediaVersion::new(format!("https://cdn.example/{}.mp4", id), 720, 1280)],
            thumbnails: vec![MediaVersion::new(format!("https://cdn.example/{}.jpg", id), 720, 1280)],
        },
    )
}

fn carousel(id: u64) -> Post {
    Post::new(
        id,
        "owner",
        MediaRecord::Carousel {
            children: vec![
                MediaRecord::Image {
                    versions: vec![MediaVersion::new(format!("https://cdn.example/{}_a.jpg", id), 1080, 1080)],
                },
                MediaRecord::Video {
                    versions: vec![MediaVersion::new(format!("https://cdn.example/{}_b.mp4", id), 720, 1280)],
                    thumbnails: vec![],
                },
            ],
        },
    )
}

fn broken(id: u64) -> Post {
    Post::new(
        id,
        "owner",
        MediaRecord::Image {
            versions: vec![MediaVersion::new(format!("https://cdn.example/broken/{}.jpg", id), 1, 1)],
        },
    )
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| !n.ends_with(".part"))
        .collect();
    names.sort();
    names
}

struct Harness {
    tmp: TempDir,
    platform: FakePlatform,
    fetcher: Arc<CountingFetcher>,
    first_delays: AtomicUsize,
    later_delays: AtomicUsize,
}

impl Harness {
    fn new(platform: FakePlatform) -> Self {
        Self {
            tmp: TempDir::new().unwrap(),
            platform,
            fetcher: Arc::new(CountingFetcher::default()),
            first_delays: AtomicUsize::new(0),
            later_delays: AtomicUsize::new(0),
        }
    }

    fn root(&self) -> PathBuf {
        self.tmp.path().to_path_buf()
    }

    async fn run(&self, selection: &CollectionSelection) -> RunReport {
        let layout = StoreLayout::new(self.root());
        let cache = ContentCache::new(&layout, self.fetcher.clone());
        cache.prepare().await.unwrap();

        let session = self
            .platform
            .login(&Credentials {
                username: "someone".into(),
                secret: "session".into(),
            })
            .await
            .unwrap();
        let collections = self.platform.list_collections(&session).await.unwrap();

        let pacing = |first_page: bool| {
            if first_page {
                self.first_delays.fetch_add(1, Ordering::SeqCst);
            } else {
                self.later_delays.fetch_add(1, Ordering::SeqCst);
            }
            Duration::ZERO
        };

        let ctx = SyncContext {
            platform: &self.platform,
            session: &session,
            cache: &cache,
            pacing: &pacing as &dyn DelayPolicy,
            save_metadata: true,
            show_downloads: false,
        };

        sync_collections(&ctx, &layout, &collections, selection).await
    }
}

#[tokio::test]
async fn test_two_page_collection_downloads_and_links_everything() {
    let platform = FakePlatform::default().with_collection(
        "17",
        "Travel",
        vec![Some(vec![image(101), video(102)]), Some(vec![image(103)])],
    );
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    assert_eq!(report.synced.len(), 1);
    assert!(report.failed.is_empty());
    let travel = &report.synced[0];
    assert_eq!(travel.pages_fetched, 2);
    assert_eq!(travel.posts_seen, 3);
    assert_eq!(travel.files_downloaded, 3);
    assert_eq!(travel.links_created, 3);

    let mut expected = vec![
        format!("{}.jpg", shortcode_for(101).unwrap()),
        format!("{}.mp4", shortcode_for(102).unwrap()),
        format!("{}.jpg", shortcode_for(103).unwrap()),
    ];
    expected.sort();

    assert_eq!(file_names(&harness.root().join(".ORIGINAL_MEDIA")), expected);
    assert_eq!(file_names(&harness.root().join("Travel")), expected);
    assert_eq!(file_names(&harness.root().join(".JSON")).len(), 3);

    // Only the second page waits.
    assert_eq!(harness.first_delays.load(Ordering::SeqCst), 1);
    assert_eq!(harness.later_delays.load(Ordering::SeqCst), 1);
    assert_eq!(harness.fetcher.calls(), 3);
}

#[tokio::test]
async fn test_carousel_on_second_page_gets_indexed_names() {
    let platform = FakePlatform::default().with_collection(
        "17",
        "Travel",
        vec![Some(vec![image(301)]), Some(vec![carousel(302)])],
    );
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    let travel = &report.synced[0];
    assert_eq!(travel.files_downloaded, 3);
    assert_eq!(travel.links_created, 3);
    assert_eq!(harness.later_delays.load(Ordering::SeqCst), 1);

    let code = shortcode_for(302).unwrap();
    let mut expected = vec![
        format!("{}.jpg", shortcode_for(301).unwrap()),
        format!("{}.0.jpg", code),
        format!("{}.1.mp4", code),
    ];
    expected.sort();
    assert_eq!(file_names(&harness.root().join(".ORIGINAL_MEDIA")), expected);
    assert_eq!(file_names(&harness.root().join("Travel")), expected);
}

#[tokio::test]
async fn test_unknown_requested_name_is_skipped_silently() {
    let platform = FakePlatform::default()
        .with_collection("17", "Travel", vec![Some(vec![image(101)])])
        .with_collection("18", "Food", vec![Some(vec![image(201)])]);
    let harness = Harness::new(platform);

    let report = harness
        .run(&CollectionSelection::named(["Travel", "Nonexistent"]))
        .await;

    assert_eq!(report.synced.len(), 1);
    assert_eq!(report.synced[0].collection_name, "Travel");
    assert!(report.failed.is_empty());
    assert_eq!(report.unmatched, ["Nonexistent"]);

    assert!(harness.root().join("Travel").is_dir());
    assert!(!harness.root().join("Food").exists());
    assert!(!harness.root().join("Nonexistent").exists());
    assert_eq!(
        harness.platform.fetched_collections(),
        HashSet::from(["17".to_string()])
    );
}

#[tokio::test]
async fn test_download_failure_does_not_stop_later_items_or_pages() {
    let platform = FakePlatform::default().with_collection(
        "17",
        "Travel",
        vec![Some(vec![broken(101), image(102)]), Some(vec![image(103)])],
    );
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    assert!(report.failed.is_empty());
    let travel = &report.synced[0];
    assert_eq!(travel.download_failures, 1);
    assert_eq!(travel.files_downloaded, 2);
    assert_eq!(travel.pages_fetched, 2);

    let linked = file_names(&harness.root().join("Travel"));
    assert_eq!(linked.len(), 2);
    assert!(!linked.iter().any(|n| n.starts_with(&shortcode_for(101).unwrap())));
    // No partial body is left behind for the failed item.
    assert_eq!(file_names(&harness.root().join(".ORIGINAL_MEDIA")).len(), 2);
}

#[tokio::test]
async fn test_unresolvable_post_is_skipped() {
    let empty = Post::new(104, "owner", MediaRecord::Carousel { children: vec![] });
    let platform = FakePlatform::default().with_collection(
        "17",
        "Travel",
        vec![Some(vec![empty, image(105)])],
    );
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    let travel = &report.synced[0];
    assert_eq!(travel.unresolvable, 1);
    assert_eq!(travel.links_created, 1);
}

#[tokio::test]
async fn test_page_failure_aborts_only_that_collection() {
    let platform = FakePlatform::default()
        .with_collection("18", "Food", vec![Some(vec![image(201)]), None])
        .with_collection("17", "Travel", vec![Some(vec![image(101)])]);
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    assert_eq!(report.failed.len(), 1);
    let food = &report.failed[0];
    assert_eq!(food.collection_name, "Food");
    assert!(matches!(food.error, Error::Transport(_)));
    // Items from the page before the failure stay linked.
    assert_eq!(food.partial.links_created, 1);
    assert_eq!(file_names(&harness.root().join("Food")).len(), 1);

    assert_eq!(report.synced.len(), 1);
    assert_eq!(report.synced[0].collection_name, "Travel");
    assert_eq!(file_names(&harness.root().join("Travel")).len(), 1);
}

#[tokio::test]
async fn test_rerun_downloads_nothing() {
    let platform = FakePlatform::default().with_collection(
        "17",
        "Travel",
        vec![Some(vec![image(101), video(102)]), Some(vec![image(103)])],
    );
    let harness = Harness::new(platform);

    harness.run(&CollectionSelection::all()).await;
    assert_eq!(harness.fetcher.calls(), 3);

    let report = harness.run(&CollectionSelection::all()).await;
    assert_eq!(harness.fetcher.calls(), 3);

    let travel = &report.synced[0];
    assert_eq!(travel.files_downloaded, 0);
    assert_eq!(travel.cache_hits, 3);
    assert_eq!(travel.links_created, 0);
    assert_eq!(travel.links_existing, 3);
}

#[tokio::test]
async fn test_post_saved_twice_is_downloaded_once() {
    let platform = FakePlatform::default()
        .with_collection("17", "Travel", vec![Some(vec![image(101)])])
        .with_collection("18", "Food", vec![Some(vec![image(101)])]);
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    assert_eq!(report.synced.len(), 2);
    assert_eq!(harness.fetcher.calls(), 1);
    assert_eq!(report.files_downloaded(), 1);
    assert_eq!(report.links_created(), 2);

    let name = format!("{}.jpg", shortcode_for(101).unwrap());
    let travel = std::fs::read(harness.root().join("Travel").join(&name)).unwrap();
    let food = std::fs::read(harness.root().join("Food").join(&name)).unwrap();
    assert_eq!(travel, food);
    assert_eq!(file_names(&harness.root().join(".ORIGINAL_MEDIA")), [name]);
}

#[tokio::test]
async fn test_collections_escaping_to_one_name_keep_separate_directories() {
    let platform = FakePlatform::default()
        .with_collection("17", "Food/Drink", vec![Some(vec![image(101)])])
        .with_collection("18", "Food_Drink", vec![Some(vec![image(201)])]);
    let harness = Harness::new(platform);

    let report = harness.run(&CollectionSelection::all()).await;

    assert_eq!(report.synced.len(), 2);
    assert!(report.failed.is_empty());

    let first = file_names(&harness.root().join("Food_Drink"));
    let second = file_names(&harness.root().join("Food_Drink (18)"));
    assert_eq!(first, [format!("{}.jpg", shortcode_for(101).unwrap())]);
    assert_eq!(second, [format!("{}.jpg", shortcode_for(201).unwrap())]);
}
