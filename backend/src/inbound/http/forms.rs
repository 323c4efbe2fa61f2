//! Request bodies and query strings accepted by the HTML forms.

use actix_multipart::{Field, Multipart};
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::TryStreamExt as _;
use futures_util::future::{Ready, ready};
use serde::Deserialize;
use url::form_urlencoded;
use zeroize::Zeroizing;

use crate::domain::{Error, IMAGE_MAX_BYTES, PostDraft, SignupForm, UploadedImage};

/// Cap for plain text parts of the post form.
const TEXT_FIELD_MAX_BYTES: usize = 64 * 1024;

/// `?page=N` selector shared by every feed.
#[derive(Debug, Default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Flag set by the comment handler when it dropped an empty comment.
#[derive(Debug, Default)]
pub struct DetailQuery {
    pub comment_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Last value of `name` in a raw query string.
///
/// Repeated keys, unknown keys and undecodable pairs never reject the
/// request; the last occurrence wins.
pub fn query_value(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .filter(|(key, _)| key == name)
        .last()
        .map(|(_, value)| value.into_owned())
}

macro_rules! lenient_query {
    ($ty:ident { $field:ident }) => {
        impl FromRequest for $ty {
            type Error = Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(Ok(Self {
                    $field: query_value(req.query_string(), stringify!($field)),
                }))
            }
        }
    };
}

lenient_query!(PageQuery { page });
lenient_query!(DetailQuery { comment_error });
lenient_query!(NextQuery { next });

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct SignupInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

impl From<SignupInput> for SignupForm {
    fn from(input: SignupInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            username: input.username,
            password: Zeroizing::new(input.password),
            password_confirmation: Zeroizing::new(input.password_confirmation),
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("malformed form submission: {err}"))
}

/// Read a field, keeping at most `cap + 1` bytes so oversize input is
/// detectable without buffering all of it.
async fn read_capped(field: &mut Field, cap: usize) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(malformed)? {
        let room = (cap + 1).saturating_sub(buffer.len());
        buffer.extend_from_slice(chunk.get(..room.min(chunk.len())).unwrap_or_default());
    }
    Ok(buffer)
}

async fn read_text(field: &mut Field) -> Result<String, Error> {
    let bytes = read_capped(field, TEXT_FIELD_MAX_BYTES).await?;
    if bytes.len() > TEXT_FIELD_MAX_BYTES {
        return Err(Error::invalid_request("form field too large"));
    }
    String::from_utf8(bytes).map_err(|_| Error::invalid_request("form fields must be UTF-8"))
}

/// Parse the multipart post form (`text`, `group`, `image`, `clear_image`).
///
/// An image part without a file name or content counts as "no upload".
pub async fn read_post_draft(mut payload: Multipart) -> Result<PostDraft, Error> {
    let mut draft = PostDraft::default();
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "text" => draft.text = read_text(&mut field).await?,
            "group" => draft.group = read_text(&mut field).await?,
            "clear_image" => draft.clear_image = !read_text(&mut field).await?.is_empty(),
            "image" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|disposition| disposition.get_filename())
                    .unwrap_or_default()
                    .to_owned();
                let bytes = read_capped(&mut field, IMAGE_MAX_BYTES).await?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    draft.image = Some(UploadedImage::new(file_name, bytes));
                }
            }
            _ => {
                read_capped(&mut field, 0).await?;
            }
        }
    }
    Ok(draft)
}
