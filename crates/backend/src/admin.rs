// =============================================================================
// Atlas Backend - Admin Interface
// =============================================================================
// Server-rendered page for listing locations and adding them through a form.
// =============================================================================

use atlas_geo::{LocationRecord, NewLocation};
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddLocationForm {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Admin dashboard: location table plus an add form.
pub async fn admin_dashboard(State(state): State<AppState>) -> Html<String> {
    let rows: String = state.store.list().iter().map(location_row).collect();

    Html(format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>GIS Admin</title>
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 40px; }}
        table {{ border-collapse: collapse; width: 100%; margin-bottom: 32px; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        label {{ display: block; margin-top: 12px; }}
    </style>
</head>
<body>
    <h1>Locations</h1>
    <table>
        <tr><th>ID</th><th>Name</th><th>Latitude</th><th>Longitude</th><th>Category</th><th>Description</th></tr>
        {rows}
    </table>
    <h2>Add Location</h2>
    <form method="post" action="/admin/locations">
        <label>Name <input name="name" required></label>
        <label>Latitude <input name="latitude" type="number" step="any" min="-90" max="90" required></label>
        <label>Longitude <input name="longitude" type="number" step="any" min="-180" max="180" required></label>
        <label>Category <input name="category"></label>
        <label>Description <input name="description"></label>
        <button type="submit">Add</button>
    </form>
</body>
</html>"#))
}

/// Add a location from the admin form, then back to the dashboard.
pub async fn add_location(
    State(state): State<AppState>,
    Form(form): Form<AddLocationForm>,
) -> Result<Redirect, ApiError> {
    let mut new = NewLocation::new(form.name, form.latitude, form.longitude);
    new.description = form.description.filter(|s| !s.trim().is_empty());
    new.category = form.category.filter(|s| !s.trim().is_empty());

    state.store.insert(new)?;
    Ok(Redirect::to("/admin"))
}

fn location_row(record: &LocationRecord) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        record.id,
        escape_html(&record.name),
        record.position.latitude,
        record.position.longitude,
        escape_html(record.category.as_deref().unwrap_or("")),
        escape_html(record.description.as_deref().unwrap_or("")),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>Tom & Jerry's</b>"), "&lt;b&gt;Tom &amp; Jerry&#39;s&lt;/b&gt;");
    }
}
