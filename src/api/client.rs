//! HTTP client for the gesture catalogue backend.
//!
//! One method per backend operation. Nothing is retried or cached; every
//! failure is returned to the caller as an [`ApiError`].

use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ApiConfig;
use crate::model::{
    Credentials, DescriptionDraft, Gesture, GestureDraft, MeaningDraft, PictureFile, PictureMeta,
};

use super::error::ApiError;
use super::session::{SessionStore, SessionToken};
use super::token::TokenPayload;

/// Number of gestures per listing page. The backend honours `max` but the
/// UI always asks for this many.
pub const PAGE_SIZE: u64 = 10;

/// Header carrying the number of gestures matching the listing query.
pub const TOTAL_ITEMS_HEADER: &str = "total-items";

/// One page of the gesture listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GesturePage {
    pub gestures: Vec<Gesture>,
    pub total_pages: u32,
}

/// Number of pages for `total_items` results, never less than one.
///
/// `None` (header missing or unreadable) counts as a single page.
pub fn total_pages(total_items: Option<u64>) -> u32 {
    let pages = total_items.unwrap_or(0).div_ceil(PAGE_SIZE).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl ApiClient {
    /// Build a client for the configured backend.
    ///
    /// The session store is shared: clones of it (e.g. held by the UI) see
    /// the token set by [`ApiClient::login`].
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            path: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| ApiError::Transport {
                path: config.base_url.clone(),
                source: e,
            })?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // -- Gestures --------------------------------------------------------------

    pub async fn list_gestures(&self, page: u32, search: &str) -> Result<GesturePage, ApiError> {
        let path = "gestures";
        let mut url = self.endpoint(&[path])?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("max", &PAGE_SIZE.to_string())
                .append_pair("page", &page.to_string());
            if !search.is_empty() {
                query.append_pair("search", search);
            }
        }

        let response = self.dispatch(path, self.request(Method::GET, url)).await?;

        let total_items = response
            .headers()
            .get(TOTAL_ITEMS_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let gestures: Vec<Gesture> = decode_json(path, response).await?;

        Ok(GesturePage {
            gestures,
            total_pages: total_pages(total_items),
        })
    }

    /// Create a gesture and return the id the backend assigned to it.
    pub async fn add_gesture(&self, draft: &GestureDraft) -> Result<String, ApiError> {
        let path = "gestures";
        let response = self.send_json(Method::POST, &[path], draft).await?;
        let body = read_text(path, response).await?;
        let id = unquote(&body);

        if id.is_empty() {
            return Err(ApiError::Decode {
                path: path.to_string(),
                message: "empty gesture id".to_string(),
            });
        }
        Ok(id)
    }

    pub async fn update_gesture(&self, id: &str, draft: &GestureDraft) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &["gestures", id], draft).await?;
        Ok(())
    }

    pub async fn delete_gesture(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["gestures", id]).await
    }

    // -- Descriptions ----------------------------------------------------------

    pub async fn add_description(
        &self,
        gesture_id: &str,
        draft: &DescriptionDraft,
    ) -> Result<(), ApiError> {
        self.send_json(Method::POST, &["gestures", gesture_id, "descriptions"], draft)
            .await?;
        Ok(())
    }

    pub async fn update_description(
        &self,
        id: &str,
        draft: &DescriptionDraft,
    ) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &["descriptions", id], draft).await?;
        Ok(())
    }

    pub async fn delete_description(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["descriptions", id]).await
    }

    // -- Meanings --------------------------------------------------------------

    pub async fn add_gesture_meaning(
        &self,
        gesture_id: &str,
        draft: &MeaningDraft,
    ) -> Result<(), ApiError> {
        self.send_json(Method::POST, &["gestures", gesture_id, "meanings"], draft)
            .await?;
        Ok(())
    }

    pub async fn add_description_meaning(
        &self,
        description_id: &str,
        draft: &MeaningDraft,
    ) -> Result<(), ApiError> {
        self.send_json(
            Method::POST,
            &["descriptions", description_id, "meanings"],
            draft,
        )
        .await?;
        Ok(())
    }

    pub async fn update_meaning(&self, id: &str, draft: &MeaningDraft) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &["meanings", id], draft).await?;
        Ok(())
    }

    pub async fn delete_meaning(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["meanings", id]).await
    }

    // -- Pictures --------------------------------------------------------------

    /// Upload a new picture for a gesture. Languages travel in the query
    /// string as a `;`-separated list.
    pub async fn add_picture(
        &self,
        gesture_id: &str,
        langs: &[String],
        file: PictureFile,
    ) -> Result<(), ApiError> {
        let segments = ["gestures", gesture_id, "pictures"];
        let path = segments.join("/");
        let mut url = self.endpoint(&segments)?;
        url.query_pairs_mut().append_pair("langs", &langs.join(";"));

        let form = picture_form(&path, file)?;
        self.dispatch(&path, self.request(Method::POST, url).multipart(form))
            .await?;
        Ok(())
    }

    pub async fn update_picture_meta(&self, id: &str, meta: &PictureMeta) -> Result<(), ApiError> {
        self.send_json(Method::PUT, &["pictures", id, "meta"], meta).await?;
        Ok(())
    }

    /// Replace the stored image of an existing picture.
    pub async fn update_picture_file(&self, id: &str, file: PictureFile) -> Result<(), ApiError> {
        let segments = ["pictures", id, "file"];
        let path = segments.join("/");
        let url = self.endpoint(&segments)?;

        let form = picture_form(&path, file)?;
        self.dispatch(&path, self.request(Method::PUT, url).multipart(form))
            .await?;
        Ok(())
    }

    pub async fn delete_picture(&self, id: &str) -> Result<(), ApiError> {
        self.send_empty(Method::DELETE, &["pictures", id]).await
    }

    // -- Session ---------------------------------------------------------------

    /// Exchange credentials for a session token.
    ///
    /// The token is stored only once its claims decode, so a failed login
    /// never replaces a working session.
    pub async fn login(&self, credentials: &Credentials) -> Result<TokenPayload, ApiError> {
        let path = "login";
        let response = self.send_json(Method::POST, &[path], credentials).await?;
        let body = read_text(path, response).await?;
        let token = SessionToken::new(unquote(&body));

        let payload = TokenPayload::decode(token.expose())?;
        self.session.set(token);

        tracing::info!(level = ?payload.level, exp = payload.exp, "Logged in");
        Ok(payload)
    }

    pub fn logout(&self) {
        self.session.clear();
        tracing::info!("Logged out");
    }

    /// Claims of the token already held in the session store, if any.
    pub fn current_session(&self) -> Option<Result<TokenPayload, ApiError>> {
        self.session
            .token()
            .map(|token| TokenPayload::decode(token.expose()).map_err(ApiError::from))
    }

    // -- Plumbing --------------------------------------------------------------

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                path: segments.join("/"),
                message: format!("'{}' cannot be a base URL", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Start a request, attaching the bearer token held right now.
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match self.session.token() {
            Some(token) => builder.header(AUTHORIZATION, token.bearer()),
            None => builder,
        }
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<Response, ApiError> {
        let path = segments.join("/");
        let url = self.endpoint(segments)?;
        self.dispatch(&path, self.request(method, url).json(body))
            .await
    }

    async fn send_empty(&self, method: Method, segments: &[&str]) -> Result<(), ApiError> {
        let path = segments.join("/");
        let url = self.endpoint(segments)?;
        self.dispatch(&path, self.request(method, url)).await?;
        Ok(())
    }

    async fn dispatch(&self, path: &str, builder: RequestBuilder) -> Result<Response, ApiError> {
        tracing::debug!(path = %path, "Sending request");

        let response = builder.send().await.map_err(|e| ApiError::Transport {
            path: path.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());

            tracing::debug!(path = %path, status = %status, "Backend rejected request");

            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

fn picture_form(path: &str, file: PictureFile) -> Result<Form, ApiError> {
    let mime = file.mime_type();
    let part = Part::bytes(file.bytes)
        .file_name(file.file_name)
        .mime_str(mime)
        .map_err(|e| ApiError::Transport {
            path: path.to_string(),
            source: e,
        })?;
    Ok(Form::new().part("picture", part))
}

async fn read_text(path: &str, response: Response) -> Result<String, ApiError> {
    response.text().await.map_err(|e| ApiError::Transport {
        path: path.to_string(),
        source: e,
    })
}

async fn decode_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T, ApiError> {
    let body = read_text(path, response).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Plain-text bodies sometimes arrive JSON-encoded (`"abc"`); accept both.
fn unquote(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}
