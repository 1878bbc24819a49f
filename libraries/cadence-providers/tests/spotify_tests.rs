//! Spotify provider tests against a mock Web API.

use cadence_core::{RecommendationContext, SearchFilters, StreamQuality};
use cadence_providers::{MusicProvider, SpotifyConfig, SpotifyProvider};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> SpotifyProvider {
    SpotifyProvider::new(&SpotifyConfig {
        client_id: Some("client".to_string()),
        client_secret: Some("secret".to_string()),
        api_url: format!("{}/v1", server.uri()),
        accounts_url: server.uri(),
    })
    .unwrap()
}

async fn mount_token(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "token-123",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn track(id: &str, name: &str, preview: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": name,
        "duration_ms": 200_000,
        "preview_url": preview,
        "popularity": 50,
        "artists": [{ "id": "artist-a", "name": "Artist A" }],
        "album": {
            "id": "album-a",
            "name": "Album A",
            "images": [{ "url": "https://i.scdn.co/image/a" }],
            "release_date": "2019-03-01"
        },
        "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", id) }
    })
}

mod authentication {
    use super::*;

    #[tokio::test]
    async fn token_is_fetched_once_for_consecutive_calls() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/tracks/t1"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(track("t1", "One", Some("https://p/1"))),
            )
            .expect(2)
            .mount(&server)
            .await;

        let spotify = provider(&server);
        assert!(spotify.get_song("t1").await.is_some());
        assert!(spotify.get_song("t1").await.is_some());
    }

    #[tokio::test]
    async fn rejected_credentials_degrade_to_empty_results() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_client"
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        assert!(spotify
            .search_songs("anything", &SearchFilters::default())
            .await
            .is_empty());
        assert!(spotify.get_song("t1").await.is_none());
    }

    #[test]
    fn missing_secret_is_a_construction_error() {
        let result = SpotifyProvider::new(&SpotifyConfig {
            client_id: Some("client".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}

mod search {
    use super::*;

    #[tokio::test]
    async fn previews_come_first_and_limit_applies() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "4"))
            .and(query_param("q", "night genre:jazz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": {
                    "items": [
                        track("no-preview-1", "Night One", None),
                        track("preview-1", "Night Two", Some("https://p/2")),
                        track("no-preview-2", "Night Three", None),
                        track("preview-2", "Night Four", Some("https://p/4")),
                    ]
                }
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let songs = spotify
            .search_songs("night", &SearchFilters::genre("Jazz", 2))
            .await;

        let ids: Vec<_> = songs.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["preview-1", "preview-2"]);
        assert!(songs.iter().all(|s| s.has_preview && !s.is_full_song));
        assert_eq!(songs[0].play_count, 500_000);
        assert_eq!(songs[0].duration, 200);
        assert_eq!(songs[0].cover, "https://i.scdn.co/image/a");
    }

    #[tokio::test]
    async fn backend_error_yields_empty_list() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let songs = spotify.search_songs("x", &SearchFilters::default()).await;
        assert!(songs.is_empty());
    }
}

mod lookups {
    use super::*;

    #[tokio::test]
    async fn unknown_track_is_none() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/tracks/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "status": 404, "message": "Not found" }
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        assert!(spotify.get_song("missing").await.is_none());
        assert!(spotify
            .get_stream_url("missing", StreamQuality::High)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn stream_without_preview_is_empty_url_not_none() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/tracks/silent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(track("silent", "Quiet", None)))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let stream = spotify
            .get_stream_url("silent", StreamQuality::High)
            .await
            .unwrap();

        assert_eq!(stream.url, "");
        assert!(stream.is_preview);
        assert_eq!(stream.quality, "96kbps");
        assert!(stream.message.unwrap().contains("30-second preview"));
    }

    #[tokio::test]
    async fn artist_combines_four_endpoints() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        let related: Vec<Value> = (0..8)
            .map(|i| json!({ "id": format!("r{}", i), "name": format!("Related {}", i), "genres": ["rock"], "images": [] }))
            .collect();

        Mock::given(method("GET"))
            .and(path("/v1/artists/a1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a1",
                "name": "Band",
                "genres": ["rock", "indie", "rock"],
                "images": [],
                "followers": { "total": 1234567 }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a1/top-tracks"))
            .and(query_param("market", "US"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [track("t1", "Hit", Some("https://p/1"))]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a1/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "id": "al1", "name": "Debut", "images": [], "release_date": "2011-06" }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a1/related-artists"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "artists": related })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let artist = spotify.get_artist("a1").await.unwrap();

        assert_eq!(artist.bio, "Band - 1,234,567 followers");
        assert_eq!(artist.genres, vec!["rock", "indie"]);
        assert_eq!(artist.image, "https://via.placeholder.com/400");
        assert_eq!(artist.top_tracks.len(), 1);
        assert_eq!(artist.albums[0].release_year, Some(2011));
        assert_eq!(artist.albums[0].artist_id, "a1");
        assert_eq!(artist.related_artists.len(), 5);
    }

    #[tokio::test]
    async fn artist_survives_missing_related_artists() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/artists/a2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "a2",
                "name": "Solo",
                "genres": ["jazz"],
                "images": [],
                "followers": { "total": 12 }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a2/top-tracks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [track("t2", "Standard", None)]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a2/albums"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/artists/a2/related-artists"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "status": 404, "message": "Not found." }
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let artist = spotify.get_artist("a2").await.unwrap();

        assert_eq!(artist.name, "Solo");
        assert_eq!(artist.top_tracks.len(), 1);
        assert!(artist.related_artists.is_empty());
    }

    #[tokio::test]
    async fn album_tracks_inherit_album_context() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/albums/al1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "al1",
                "name": "Debut",
                "images": [{ "url": "https://i.scdn.co/image/cover" }],
                "release_date": "2011-06-01",
                "artists": [{ "id": "a1", "name": "Band" }],
                "tracks": { "items": [{
                    "id": "t9",
                    "name": "Opener",
                    "duration_ms": 61_000,
                    "preview_url": "https://p/9",
                    "artists": [{ "id": "a1", "name": "Band" }]
                }] }
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let album = spotify.get_album("al1").await.unwrap();

        assert_eq!(album.artist_id, "a1");
        assert_eq!(album.artist.unwrap().name, "Band");
        assert_eq!(album.songs.len(), 1);
        let song = &album.songs[0];
        assert_eq!(song.duration, 61);
        assert_eq!(song.cover, "https://i.scdn.co/image/cover");
        assert_eq!(song.album_id.as_deref(), Some("al1"));
        assert!(song.has_preview);
    }
}

mod recommendations {
    use super::*;

    #[tokio::test]
    async fn same_tracks_fill_every_shelf() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;

        Mock::given(method("GET"))
            .and(path("/v1/recommendations"))
            .and(query_param("seed_genres", "pop,rock,hip-hop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "tracks": [track("t1", "One", None), track("t2", "Two", None)]
            })))
            .mount(&server)
            .await;

        let spotify = provider(&server);
        let recs = spotify
            .get_recommendations("user-1", &RecommendationContext::default())
            .await;

        assert_eq!(recs.daily_mix.len(), 2);
        assert_eq!(recs.daily_mix, recs.discover_weekly);
        assert_eq!(recs.daily_mix, recs.because_you_listened);
    }
}
