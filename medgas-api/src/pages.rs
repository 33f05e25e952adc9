/// Server-rendered pages
///
/// Plain HTML built from escaped strings; there is no template engine and no
/// client-side script. Every page behind the session goes through the same
/// two layers as the API: unauthenticated visitors are redirected to
/// `/login`, and a role outside the page's allow-list gets the forbidden
/// page, rendered before any data is loaded.
///
/// Navigation only links the pages the current role may open.

use crate::{app::AppState, routes::auth::{clear_session, issue_session, session_cookie}};
use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use medgas_shared::{
    auth::{
        authorization::{evaluate, Access, AllowList},
        middleware::AuthContext,
    },
    models::cylinder::CylinderStatus,
    store::StoreError,
};
use serde::Deserialize;
use std::fmt::Write as _;
use tracing::error;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;color:#1d2733}\
header{background:#0b4f71;color:#fff;padding:.75rem 1.5rem;display:flex;gap:1.5rem;align-items:center}\
header a{color:#fff;text-decoration:none}header form{margin-left:auto}\
main{padding:1.5rem}table{border-collapse:collapse;width:100%}\
th,td{border-bottom:1px solid #d5dde5;padding:.4rem .6rem;text-align:left}\
.error{color:#a4262c}.muted{color:#66727f}";

const NAV: [(&str, &str, AllowList); 6] = [
    ("/dashboard", "Dashboard", AllowList::AnyRole),
    ("/cylinders", "Cylinders", AllowList::AnyRole),
    ("/inventory", "Inventory", AllowList::STOCK),
    ("/supplies", "Supplies", AllowList::STOCK),
    ("/invoices", "Invoices", AllowList::ADMIN),
    ("/reports", "Reports", AllowList::ADMIN),
];

/// Escapes text for HTML element and attribute contexts
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn opt(value: Option<&str>) -> String {
    value.map(escape).unwrap_or_else(|| "&mdash;".to_string())
}

fn nav(auth: &AuthContext) -> String {
    let mut links = String::new();
    for (href, label, allow) in NAV {
        if evaluate(auth.role, &allow) == Access::Allowed {
            let _ = write!(links, r#"<a href="{}">{}</a>"#, href, label);
        }
    }
    links
}

fn layout(title: &str, auth: Option<&AuthContext>, body: &str) -> Html<String> {
    let header = match auth {
        Some(auth) => format!(
            r#"<header><strong>MedGas</strong>{}<form method="post" action="/logout"><span>{} ({})</span> <button type="submit">Log out</button></form></header>"#,
            nav(auth),
            escape(&auth.username),
            auth.role,
        ),
        None => "<header><strong>MedGas</strong></header>".to_string(),
    };

    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{} | MedGas</title><style>{}</style></head><body>{}<main><h1>{}</h1>{}</main></body></html>",
        escape(title),
        STYLE,
        header,
        escape(title),
        body,
    ))
}

fn table(headings: &[&str], rows: Vec<Vec<String>>) -> String {
    if rows.is_empty() {
        return r#"<p class="muted">Nothing to show.</p>"#.to_string();
    }

    let mut html = String::from("<table><thead><tr>");
    for heading in headings {
        let _ = write!(html, "<th>{}</th>", escape(heading));
    }
    html.push_str("</tr></thead><tbody>");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", cell);
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
    html
}

/// Store failure while rendering a page
pub struct PageError(StoreError);

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        PageError(err)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Page could not be rendered");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            layout(
                "Something went wrong",
                None,
                r#"<p class="error">The page could not be loaded. Please try again.</p>"#,
            ),
        )
            .into_response()
    }
}

type PageResult = Result<Html<String>, PageError>;

/// The 403 page; names the role but renders no protected data
pub fn forbidden(auth: &AuthContext) -> Html<String> {
    layout(
        "Access denied",
        Some(auth),
        &format!(
            r#"<p class="error">Your role ({}) cannot open this page.</p><p><a href="/dashboard">Back to the dashboard</a></p>"#,
            auth.role
        ),
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

fn login_page(message: Option<&str>, email: &str) -> Html<String> {
    let notice = message
        .map(|m| format!(r#"<p class="error">{}</p>"#, escape(m)))
        .unwrap_or_default();

    layout(
        "Sign in",
        None,
        &format!(
            r#"{}<form method="post" action="/login">
<p><label>Email <input type="email" name="email" value="{}" required></label></p>
<p><label>Password <input type="password" name="password" required></label></p>
<p><button type="submit">Sign in</button></p></form>"#,
            notice,
            escape(email),
        ),
    )
}

pub async fn login_form() -> Html<String> {
    login_page(None, "")
}

pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Ok(Form(form)) = form else {
        return (StatusCode::BAD_REQUEST, login_page(Some("Invalid form submission"), "")).into_response();
    };

    match issue_session(&state, form.email.trim(), &form.password).await {
        Ok((_, token)) => (jar.add(session_cookie(&state, token)), Redirect::to("/dashboard")).into_response(),
        Err(crate::error::ApiError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            login_page(Some("Invalid email or password"), &form.email),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Login could not be completed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                login_page(Some("Sign-in is temporarily unavailable"), &form.email),
            )
                .into_response()
        }
    }
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (clear_session(jar), Redirect::to("/login"))
}

pub async fn root() -> Redirect {
    Redirect::to("/dashboard")
}

pub async fn dashboard(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let cylinders = state.store.list_cylinders(None).await?;

    let mut counts = String::from("<ul>");
    for status in CylinderStatus::ALL {
        let n = cylinders.iter().filter(|c| c.status == status).count();
        let _ = write!(counts, "<li>{}: {}</li>", status, n);
    }
    counts.push_str("</ul>");

    Ok(layout(
        "Dashboard",
        Some(&auth),
        &format!(
            "<p>Welcome, {}.</p><h2>Cylinders by status</h2>{}",
            escape(&auth.username),
            counts
        ),
    ))
}

pub async fn cylinders(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let rows = state
        .store
        .list_cylinders(None)
        .await?
        .into_iter()
        .map(|c| {
            vec![
                escape(&c.code),
                escape(&c.size),
                opt(c.gas_name.as_deref()),
                c.status.to_string(),
                c.supply_id.map(|id| id.to_string()).unwrap_or_else(|| "&mdash;".to_string()),
                c.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();

    Ok(layout(
        "Cylinders",
        Some(&auth),
        &table(&["Code", "Size", "Gas", "Status", "Supply", "Updated"], rows),
    ))
}

pub async fn inventory(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let rows = state
        .store
        .inventory_summary()
        .await?
        .into_iter()
        .map(|line| {
            vec![
                escape(&line.gas_name),
                line.total_cylinders.to_string(),
                format!("{:.1}", line.total_liters),
            ]
        })
        .collect();

    Ok(layout(
        "Inventory",
        Some(&auth),
        &table(&["Gas", "Cylinders", "Liters"], rows),
    ))
}

pub async fn supplies(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let rows = state
        .store
        .list_supplies()
        .await?
        .into_iter()
        .map(|s| {
            vec![
                escape(&s.hospital_name),
                format!("{:.2}", s.total_price),
                escape(&s.recipient_name),
                escape(&s.driver_name),
                s.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();

    Ok(layout(
        "Supplies",
        Some(&auth),
        &table(&["Hospital", "Total", "Recipient", "Driver", "Date"], rows),
    ))
}

pub async fn invoices(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let rows = state
        .store
        .list_invoices()
        .await?
        .into_iter()
        .map(|i| {
            vec![
                format!(r#"<a href="/invoices/{0}">#{0}</a>"#, i.id),
                opt(i.hospital_name.as_deref()),
                format!("{:.2}", i.amount),
                i.status.to_string(),
            ]
        })
        .collect();

    Ok(layout(
        "Invoices",
        Some(&auth),
        &table(&["Invoice", "Hospital", "Amount", "Status"], rows),
    ))
}

pub async fn invoice_detail(
    State(state): State<AppState>,
    auth: AuthContext,
    id: Option<Path<i32>>,
) -> Result<Response, PageError> {
    let Some(Path(id)) = id.filter(|Path(id)| *id > 0) else {
        return Ok(not_found(&auth));
    };

    let Some(invoice) = state.store.find_invoice(id).await? else {
        return Ok(not_found(&auth));
    };

    let body = format!(
        r#"<dl><dt>Hospital</dt><dd>{}</dd><dt>Amount</dt><dd>{:.2}</dd><dt>Status</dt><dd>{}</dd><dt>Issued</dt><dd>{}</dd><dt>Last change</dt><dd>{}</dd></dl><p><a href="/invoices">All invoices</a></p>"#,
        opt(invoice.hospital_name.as_deref()),
        invoice.amount,
        invoice.status,
        invoice.created_at.format("%Y-%m-%d"),
        invoice.updated_at.format("%Y-%m-%d %H:%M"),
    );

    Ok(layout(&format!("Invoice #{}", invoice.id), Some(&auth), &body).into_response())
}

fn not_found(auth: &AuthContext) -> Response {
    (
        StatusCode::NOT_FOUND,
        layout("Not found", Some(auth), r#"<p class="muted">No such invoice.</p>"#),
    )
        .into_response()
}

pub async fn reports(State(state): State<AppState>, auth: AuthContext) -> PageResult {
    let mut body = String::new();

    for (label, status) in [
        ("Delivered", CylinderStatus::Delivered),
        ("Filled", CylinderStatus::Filled),
        ("Returned", CylinderStatus::Returned),
    ] {
        let count = state.store.cylinders_with_status(status).await?.len();
        let _ = write!(body, "<p>{} cylinders: <strong>{}</strong></p>", label, count);
    }

    let hospitals = state
        .store
        .hospitals_served()
        .await?
        .into_iter()
        .map(|h| {
            vec![
                escape(&h.hospital_name),
                h.deliveries.to_string(),
                format!("{:.2}", h.total_billed),
            ]
        })
        .collect();

    body.push_str("<h2>Hospitals served</h2>");
    body.push_str(&table(&["Hospital", "Deliveries", "Billed"], hospitals));

    Ok(layout("Reports", Some(&auth), &body))
}
