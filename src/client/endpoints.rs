//! Typed X API v2 operations, one method per endpoint the tools use.

use super::{segment, ApiResponse, Host, Query, RequestBody, XClient};
use crate::error::Result;
use reqwest::Method;
use serde_json::{json, Value};

const TWEET_DETAIL_FIELDS: &str =
    "created_at,public_metrics,author_id,conversation_id,in_reply_to_user_id,referenced_tweets,attachments";
const TWEET_DETAIL_EXPANSIONS: &str = "author_id,referenced_tweets.id,attachments.media_keys";
const TWEET_SUMMARY_FIELDS: &str = "created_at,public_metrics,author_id";
const TIMELINE_TWEET_FIELDS: &str =
    "created_at,public_metrics,author_id,conversation_id,referenced_tweets";
const PROFILE_FIELDS: &str = "created_at,description,entities,location,pinned_tweet_id,profile_image_url,protected,public_metrics,url,verified";
const MEMBER_FIELDS: &str = "created_at,description,profile_image_url,public_metrics,verified";
const LIST_FIELDS: &str = "created_at,follower_count,member_count,owner_id,description,private";
const DM_EVENT_FIELDS: &str =
    "created_at,dm_conversation_id,sender_id,text,attachments,referenced_tweets";

/// One page request: an optional size and an optional continuation token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub max_results: Option<u32>,
    pub token: Option<String>,
}

impl Page {
    pub fn new(max_results: Option<u32>, token: Option<String>) -> Self {
        Self { max_results, token }
    }

    /// Append `max_results` and the token under `token_param`.
    fn push(&self, query: &mut Query, token_param: &str) {
        if let Some(max) = self.max_results {
            query.push(("max_results".to_string(), max.to_string()));
        }
        if let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) {
            query.push((token_param.to_string(), token.to_string()));
        }
    }
}

fn query(pairs: &[(&str, &str)]) -> Query {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn paged(pairs: &[(&str, &str)], page: &Page) -> Query {
    let mut q = query(pairs);
    page.push(&mut q, "pagination_token");
    q
}

fn tweet_detail_query() -> Query {
    query(&[
        ("tweet.fields", TWEET_DETAIL_FIELDS),
        ("expansions", TWEET_DETAIL_EXPANSIONS),
        ("user.fields", "name,username,verified"),
        ("media.fields", "url,preview_image_url,type"),
    ])
}

fn tweet_summary_fields() -> [(&'static str, &'static str); 3] {
    [
        ("tweet.fields", TWEET_SUMMARY_FIELDS),
        ("expansions", "author_id"),
        ("user.fields", "name,username"),
    ]
}

fn joined(values: &[String]) -> String {
    values.join(",")
}

// Tweets
impl XClient {
    pub async fn create_tweet(&self, payload: Value) -> Result<Value> {
        self.post("/2/tweets", payload).await
    }

    pub async fn delete_tweet(&self, tweet_id: &str) -> Result<Value> {
        self.delete(&format!("/2/tweets/{}", segment(tweet_id)?)).await
    }

    pub async fn get_tweet(&self, tweet_id: &str) -> Result<Value> {
        let path = format!("/2/tweets/{}", segment(tweet_id)?);
        self.get(&path, &tweet_detail_query()).await
    }

    pub async fn get_tweets(&self, tweet_ids: &[String]) -> Result<Value> {
        let mut q = tweet_detail_query();
        q.push(("ids".to_string(), joined(tweet_ids)));
        self.get("/2/tweets", &q).await
    }

    /// Recent search is the one endpoint that pages with `next_token`.
    pub async fn search_recent(&self, search: &str, page: &Page) -> Result<Value> {
        let mut q = query(&tweet_summary_fields());
        q.push(("query".to_string(), search.to_string()));
        page.push(&mut q, "next_token");
        self.get("/2/tweets/search/recent", &q).await
    }

    pub async fn quote_tweets(&self, tweet_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/tweets/{}/quote_tweets", segment(tweet_id)?);
        self.get(&path, &paged(&tweet_summary_fields(), page)).await
    }
}

// Timelines
impl XClient {
    pub async fn home_timeline(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!(
            "/2/users/{}/timelines/reverse_chronological",
            segment(user_id)?
        );
        let q = paged(
            &[
                ("tweet.fields", TIMELINE_TWEET_FIELDS),
                ("expansions", "author_id,referenced_tweets.id"),
                ("user.fields", "name,username,verified"),
            ],
            page,
        );
        self.get(&path, &q).await
    }

    pub async fn user_tweets(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/tweets", segment(user_id)?);
        let q = paged(
            &[
                ("tweet.fields", TIMELINE_TWEET_FIELDS),
                ("expansions", "author_id,referenced_tweets.id"),
                ("user.fields", "name,username"),
            ],
            page,
        );
        self.get(&path, &q).await
    }

    pub async fn user_mentions(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/mentions", segment(user_id)?);
        let q = paged(
            &[
                (
                    "tweet.fields",
                    "created_at,public_metrics,author_id,conversation_id",
                ),
                ("expansions", "author_id"),
                ("user.fields", "name,username"),
            ],
            page,
        );
        self.get(&path, &q).await
    }
}

// Engagement
impl XClient {
    pub async fn like(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/likes", segment(user_id)?);
        self.post(&path, json!({ "tweet_id": tweet_id })).await
    }

    pub async fn unlike(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/likes/{}",
            segment(user_id)?,
            segment(tweet_id)?
        );
        self.delete(&path).await
    }

    pub async fn retweet(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/retweets", segment(user_id)?);
        self.post(&path, json!({ "tweet_id": tweet_id })).await
    }

    pub async fn unretweet(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/retweets/{}",
            segment(user_id)?,
            segment(tweet_id)?
        );
        self.delete(&path).await
    }

    pub async fn bookmark(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/bookmarks", segment(user_id)?);
        self.post(&path, json!({ "tweet_id": tweet_id })).await
    }

    pub async fn delete_bookmark(&self, user_id: &str, tweet_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/bookmarks/{}",
            segment(user_id)?,
            segment(tweet_id)?
        );
        self.delete(&path).await
    }

    pub async fn liked_tweets(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/liked_tweets", segment(user_id)?);
        self.get(&path, &paged(&tweet_summary_fields(), page)).await
    }

    pub async fn bookmarks(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/bookmarks", segment(user_id)?);
        self.get(&path, &paged(&tweet_summary_fields(), page)).await
    }
}

// Users
impl XClient {
    pub async fn follow(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/following", segment(user_id)?);
        self.post(&path, json!({ "target_user_id": target_user_id }))
            .await
    }

    pub async fn unfollow(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/following/{}",
            segment(user_id)?,
            segment(target_user_id)?
        );
        self.delete(&path).await
    }

    /// Authenticated user with the full profile field set.
    pub async fn me(&self) -> Result<Value> {
        self.get("/2/users/me", &query(&[("user.fields", PROFILE_FIELDS)]))
            .await
    }

    /// Bare `/2/users/me`, keeping the rate-limit headers.
    pub async fn me_with_rate_limit(&self) -> Result<ApiResponse> {
        self.send(Method::GET, Host::Api, "/2/users/me", &[], RequestBody::Empty)
            .await
    }

    pub async fn user(&self, user_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}", segment(user_id)?);
        self.get(&path, &query(&[("user.fields", PROFILE_FIELDS)]))
            .await
    }

    pub async fn users(&self, user_ids: &[String]) -> Result<Value> {
        let ids = joined(user_ids);
        self.get(
            "/2/users",
            &query(&[("ids", ids.as_str()), ("user.fields", PROFILE_FIELDS)]),
        )
        .await
    }

    pub async fn user_by_username(&self, username: &str) -> Result<Value> {
        let path = format!("/2/users/by/username/{}", segment(username)?);
        self.get(&path, &query(&[("user.fields", PROFILE_FIELDS)]))
            .await
    }

    pub async fn users_by_usernames(&self, usernames: &[String]) -> Result<Value> {
        let names = joined(usernames);
        self.get(
            "/2/users/by",
            &query(&[("usernames", names.as_str()), ("user.fields", PROFILE_FIELDS)]),
        )
        .await
    }

    pub async fn followers(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/followers", segment(user_id)?);
        self.get(&path, &paged(&[("user.fields", PROFILE_FIELDS)], page))
            .await
    }

    pub async fn following(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/following", segment(user_id)?);
        self.get(&path, &paged(&[("user.fields", PROFILE_FIELDS)], page))
            .await
    }
}

// Blocks and mutes
impl XClient {
    pub async fn block(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/blocking", segment(user_id)?);
        self.post(&path, json!({ "target_user_id": target_user_id }))
            .await
    }

    pub async fn unblock(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/blocking/{}",
            segment(user_id)?,
            segment(target_user_id)?
        );
        self.delete(&path).await
    }

    pub async fn mute(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/muting", segment(user_id)?);
        self.post(&path, json!({ "target_user_id": target_user_id }))
            .await
    }

    pub async fn unmute(&self, user_id: &str, target_user_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/muting/{}",
            segment(user_id)?,
            segment(target_user_id)?
        );
        self.delete(&path).await
    }
}

// Direct messages
impl XClient {
    pub async fn send_dm_to_participant(&self, participant_id: &str, message: Value) -> Result<Value> {
        let path = format!(
            "/2/dm_conversations/with/{}/messages",
            segment(participant_id)?
        );
        self.post(&path, message).await
    }

    pub async fn send_dm_in_conversation(
        &self,
        conversation_id: &str,
        message: Value,
    ) -> Result<Value> {
        let path = format!(
            "/2/dm_conversations/{}/messages",
            segment(conversation_id)?
        );
        self.post(&path, message).await
    }

    pub async fn create_dm_conversation(
        &self,
        participant_ids: &[String],
        text: &str,
    ) -> Result<Value> {
        let body = json!({
            "conversation_type": "Group",
            "participant_ids": participant_ids,
            "message": { "text": text },
        });
        self.post("/2/dm_conversations", body).await
    }

    pub async fn dm_events(&self, page: &Page) -> Result<Value> {
        let q = paged(
            &[
                ("dm_event.fields", DM_EVENT_FIELDS),
                ("expansions", "sender_id,referenced_tweets.id"),
                ("user.fields", "name,username"),
            ],
            page,
        );
        self.get("/2/dm_events", &q).await
    }

    pub async fn dm_conversation_events(&self, conversation_id: &str, page: &Page) -> Result<Value> {
        let path = format!(
            "/2/dm_conversations/{}/dm_events",
            segment(conversation_id)?
        );
        let q = paged(
            &[
                ("dm_event.fields", DM_EVENT_FIELDS),
                ("expansions", "sender_id"),
                ("user.fields", "name,username"),
            ],
            page,
        );
        self.get(&path, &q).await
    }
}

// Lists
impl XClient {
    pub async fn create_list(&self, body: Value) -> Result<Value> {
        self.post("/2/lists", body).await
    }

    pub async fn update_list(&self, list_id: &str, body: Value) -> Result<Value> {
        self.put(&format!("/2/lists/{}", segment(list_id)?), body)
            .await
    }

    pub async fn delete_list(&self, list_id: &str) -> Result<Value> {
        self.delete(&format!("/2/lists/{}", segment(list_id)?)).await
    }

    pub async fn add_list_member(&self, list_id: &str, user_id: &str) -> Result<Value> {
        let path = format!("/2/lists/{}/members", segment(list_id)?);
        self.post(&path, json!({ "user_id": user_id })).await
    }

    pub async fn remove_list_member(&self, list_id: &str, user_id: &str) -> Result<Value> {
        let path = format!(
            "/2/lists/{}/members/{}",
            segment(list_id)?,
            segment(user_id)?
        );
        self.delete(&path).await
    }

    pub async fn follow_list(&self, user_id: &str, list_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/followed_lists", segment(user_id)?);
        self.post(&path, json!({ "list_id": list_id })).await
    }

    pub async fn unfollow_list(&self, user_id: &str, list_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/followed_lists/{}",
            segment(user_id)?,
            segment(list_id)?
        );
        self.delete(&path).await
    }

    pub async fn pin_list(&self, user_id: &str, list_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/pinned_lists", segment(user_id)?);
        self.post(&path, json!({ "list_id": list_id })).await
    }

    pub async fn unpin_list(&self, user_id: &str, list_id: &str) -> Result<Value> {
        let path = format!(
            "/2/users/{}/pinned_lists/{}",
            segment(user_id)?,
            segment(list_id)?
        );
        self.delete(&path).await
    }

    pub async fn list(&self, list_id: &str) -> Result<Value> {
        let path = format!("/2/lists/{}", segment(list_id)?);
        self.get(&path, &query(&[("list.fields", LIST_FIELDS)])).await
    }

    pub async fn list_tweets(&self, list_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/lists/{}/tweets", segment(list_id)?);
        self.get(&path, &paged(&tweet_summary_fields(), page)).await
    }

    pub async fn owned_lists(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/owned_lists", segment(user_id)?);
        self.get(&path, &paged(&[("list.fields", LIST_FIELDS)], page))
            .await
    }

    pub async fn list_members(&self, list_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/lists/{}/members", segment(list_id)?);
        self.get(&path, &paged(&[("user.fields", MEMBER_FIELDS)], page))
            .await
    }

    pub async fn followed_lists(&self, user_id: &str, page: &Page) -> Result<Value> {
        let path = format!("/2/users/{}/followed_lists", segment(user_id)?);
        self.get(&path, &paged(&[("list.fields", LIST_FIELDS)], page))
            .await
    }

    pub async fn pinned_lists(&self, user_id: &str) -> Result<Value> {
        let path = format!("/2/users/{}/pinned_lists", segment(user_id)?);
        self.get(&path, &query(&[("list.fields", LIST_FIELDS)])).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::test_client;
    use httpmock::prelude::*;

    #[test]
    fn test_page_push() {
        let mut q = Query::new();
        Page::new(Some(50), Some("abc".to_string())).push(&mut q, "pagination_token");
        assert_eq!(
            q,
            vec![
                ("max_results".to_string(), "50".to_string()),
                ("pagination_token".to_string(), "abc".to_string()),
            ]
        );

        let mut q = Query::new();
        Page::new(None, Some(String::new())).push(&mut q, "next_token");
        assert!(q.is_empty());
    }

    #[tokio::test]
    async fn test_search_uses_next_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/2/tweets/search/recent")
                .query_param("query", "from:rustlang")
                .query_param("max_results", "25")
                .query_param("next_token", "t1")
                .query_param("expansions", "author_id");
            then.status(200).json_body(json!({ "data": [] }));
        });

        test_client(&server)
            .search_recent("from:rustlang", &Page::new(Some(25), Some("t1".into())))
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_followers_use_pagination_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/2/users/42/followers")
                .query_param("max_results", "100")
                .query_param("pagination_token", "p2")
                .query_param("user.fields", PROFILE_FIELDS);
            then.status(200).json_body(json!({ "data": [] }));
        });

        test_client(&server)
            .followers("42", &Page::new(Some(100), Some("p2".into())))
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_like_posts_tweet_id() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/2/users/7/likes")
                .json_body(json!({ "tweet_id": "99" }));
            then.status(200).json_body(json!({ "data": { "liked": true } }));
        });

        let body = test_client(&server).like("7", "99").await.unwrap();
        mock.assert();
        assert_eq!(body["data"]["liked"], json!(true));
    }

    #[tokio::test]
    async fn test_unfollow_deletes_nested_path() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/2/users/7/following/8");
            then.status(200)
                .json_body(json!({ "data": { "following": false } }));
        });

        test_client(&server).unfollow("7", "8").await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_get_tweets_joins_ids() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/2/tweets")
                .query_param("ids", "1,2,3");
            then.status(200).json_body(json!({ "data": [] }));
        });

        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        test_client(&server).get_tweets(&ids).await.unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_group_dm_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/2/dm_conversations").json_body(json!({
                "conversation_type": "Group",
                "participant_ids": ["1", "2"],
                "message": { "text": "hello" }
            }));
            then.status(201)
                .json_body(json!({ "data": { "dm_conversation_id": "c1" } }));
        });

        let ids = vec!["1".to_string(), "2".to_string()];
        test_client(&server)
            .create_dm_conversation(&ids, "hello")
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn test_traversing_id_never_reaches_server() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.path_contains("/2/");
            then.status(200);
        });

        assert!(test_client(&server).delete_tweet("..").await.is_err());
        mock.assert_hits(0);
    }
}
