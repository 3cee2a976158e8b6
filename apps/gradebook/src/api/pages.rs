//! HTML pages.
//!
//! Plain string assembly; every piece of user-controlled text goes through
//! [`escape_html`].

use super::flash::Flash;
use crate::display::{escape_html, format_average};
use gradebook_core::{ClassifiedStudent, Slot, StudentRecord, ALLOWED_EXTENSIONS};

fn page(title: &str, body: &str) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("</head>\n<body>\n");
    html.push_str("<nav><a href=\"/\">Upload</a> | <a href=\"/classification\">Classification</a></nav>\n");
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

fn flash_block(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            "<p class=\"flash {}\">{}</p>\n",
            flash.level.as_str(),
            escape_html(&flash.message)
        ),
        None => String::new(),
    }
}

fn upload_form() -> String {
    let accept = ALLOWED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(",");

    let mut form = String::new();
    form.push_str("<form method=\"post\" action=\"/upload\" enctype=\"multipart/form-data\">\n");
    for slot in Slot::ALL {
        let name = slot.field_name();
        form.push_str(&format!(
            "<label>{name} <input type=\"file\" name=\"{name}\" accept=\"{accept}\"></label><br>\n"
        ));
    }
    form.push_str("<button type=\"submit\">Upload</button>\n</form>\n");
    form
}

/// `GET /`: upload form, flash message and every stored record.
#[must_use]
pub fn render_index(records: &[StudentRecord], flash: Option<&Flash>) -> String {
    let mut body = String::new();
    body.push_str("<h1>Students</h1>\n");
    body.push_str(&flash_block(flash));
    body.push_str(&upload_form());

    if records.is_empty() {
        body.push_str("<p>No students yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Id</th><th>Name</th><th>Grades 1</th><th>Grades 2</th><th>Grades 3</th></tr>\n");
        for record in records {
            let [a, b, c] = record.averages.as_array();
            body.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                record.id,
                escape_html(&record.name),
                format_average(a),
                format_average(b),
                format_average(c),
            ));
        }
        body.push_str("</table>\n");
    }

    page("Students", &body)
}

/// `GET /classification`: every record with its tier.
#[must_use]
pub fn render_classification(rows: &[ClassifiedStudent]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Classification</h1>\n");

    if rows.is_empty() {
        body.push_str("<p>No students yet.</p>\n");
    } else {
        body.push_str("<table>\n<tr><th>Name</th><th>Averages</th><th>Classification</th></tr>\n");
        for row in rows {
            let [a, b, c] = row.averages.as_array();
            body.push_str(&format!(
                "<tr><td>{}</td><td>({}, {}, {})</td><td>{}</td></tr>\n",
                escape_html(&row.name),
                format_average(a),
                format_average(b),
                format_average(c),
                row.tier.label(),
            ));
        }
        body.push_str("</table>\n");
    }

    page("Classification", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::{classify_all, Averages, NewStudent, StudentId};

    fn record(id: u64, name: &str, averages: Averages) -> StudentRecord {
        StudentRecord::from_new(StudentId(id), NewStudent::new(name, averages))
    }

    #[test]
    fn index_has_three_file_inputs() {
        let html = render_index(&[], None);
        for field in ["file1", "file2", "file3"] {
            assert!(html.contains(&format!("name=\"{field}\"")));
        }
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("No students yet."));
    }

    #[test]
    fn index_lists_records_and_flash() {
        let records = vec![record(1, "alice.png", Averages::new(17.0, 15.0, 13.0))];
        let flash = Flash::success("Files uploaded");
        let html = render_index(&records, Some(&flash));
        assert!(html.contains("<td>alice.png</td><td>17.0</td><td>15.0</td><td>13.0</td>"));
        assert!(html.contains("<p class=\"flash success\">Files uploaded</p>"));
    }

    #[test]
    fn names_are_escaped() {
        let records = vec![record(1, "<script>.png", Averages::default())];
        let html = render_index(&records, None);
        assert!(html.contains("&lt;script&gt;.png"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn classification_shows_tier() {
        let records = vec![
            record(1, "a.png", Averages::new(17.0, 15.0, 13.0)),
            record(2, "b.png", Averages::new(16.0, 16.0, 16.0)),
        ];
        let html = render_classification(&classify_all(&records));
        assert!(html.contains("<td>a.png</td><td>(17.0, 15.0, 13.0)</td><td>Bien</td>"));
        assert!(html.contains("<td>b.png</td><td>(16.0, 16.0, 16.0)</td><td>Excellent</td>"));
    }
}
