//! Sign-up, login and logout pages.

use actix_web::{get, post, web};

use crate::domain::ports::SignupOutcome;
use crate::domain::{ErrorCode, LoginCredentials, SignupErrors, SignupForm};

use super::error::HttpResult;
use super::feeds::redirect;
use super::forms::{LoginForm, NextQuery, SignupInput};
use super::session::{safe_next, SessionContext};
use super::state::HttpState;
use super::views::{html, LoginPage, NavView, SignupPage};

const AFTER_LOGIN: &str = "/";
const BAD_LOGIN: &str = "Please enter a correct username and password.";

#[get("/auth/signup/")]
pub async fn signup_form(session: SessionContext) -> HttpResult {
    let viewer = session.viewer()?;
    html(&SignupPage {
        nav: NavView::for_viewer(viewer.as_ref()),
        first_name: String::new(),
        last_name: String::new(),
        username: String::new(),
        errors: SignupErrors::default(),
    })
}

/// A successful sign-up signs the new user in.
#[post("/auth/signup/")]
pub async fn signup_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    input: web::Form<SignupInput>,
) -> HttpResult {
    let form = SignupForm::from(input.into_inner());
    let (first_name, last_name, username) = (
        form.first_name.clone(),
        form.last_name.clone(),
        form.username.clone(),
    );
    match state.accounts.sign_up(form).await? {
        SignupOutcome::Registered(user) => {
            session.persist_user(&user)?;
            Ok(redirect(AFTER_LOGIN))
        }
        SignupOutcome::Rejected(errors) => html(&SignupPage {
            nav: NavView::default(),
            first_name,
            last_name,
            username,
            errors,
        }),
    }
}

#[get("/auth/login/")]
pub async fn login_form(session: SessionContext, query: NextQuery) -> HttpResult {
    let viewer = session.viewer()?;
    html(&LoginPage {
        nav: NavView::for_viewer(viewer.as_ref()),
        username: String::new(),
        next: safe_next(query.next.as_deref()).unwrap_or_default().to_owned(),
        error: None,
    })
}

#[post("/auth/login/")]
pub async fn login_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> HttpResult {
    let LoginForm {
        username,
        password,
        next,
    } = form.into_inner();
    let next = safe_next(next.as_deref()).map(str::to_owned);
    let rejected = |username: String, next: Option<String>| {
        html(&LoginPage {
            nav: NavView::default(),
            username,
            next: next.unwrap_or_default(),
            error: Some(BAD_LOGIN.to_owned()),
        })
    };

    let Ok(credentials) = LoginCredentials::try_from_parts(&username, &password) else {
        return rejected(username, next);
    };
    match state.accounts.authenticate(&credentials).await {
        Ok(user) => {
            session.persist_user(&user)?;
            Ok(redirect(next.as_deref().unwrap_or(AFTER_LOGIN)))
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => rejected(username, next),
        Err(error) => Err(error),
    }
}

#[get("/auth/logout/")]
pub async fn logout(session: SessionContext) -> HttpResult {
    session.clear();
    Ok(redirect(AFTER_LOGIN))
}
