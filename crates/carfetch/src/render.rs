//! HTML rendering of filtered records and failures.

use std::fmt::Display;

use serde_json::Number;

use crate::target::RenderTarget;
use crate::types::{CarRecord, FetchMethod};

/// Shown instead of a table when nothing passes the filter.
pub const NO_RESULTS: &str = "<p>No cars with MPG > 25 found.</p>";

const COLUMNS: [&str; 4] = ["Model", "MPG", "Cylinders", "HP"];

/// Heading naming the method that produced the data.
pub fn render_heading(method: FetchMethod) -> String {
    format!("<h2>Fetched using {}</h2>", method.label())
}

/// Everything below the heading: a table, or [`NO_RESULTS`].
///
/// Cell values are inserted verbatim without escaping. Absent fields
/// produce an empty cell.
pub fn render_body<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a CarRecord>,
{
    let mut rows = String::new();
    for record in records {
        rows.push_str("<tr>");
        push_cell(&mut rows, record.model.as_deref().unwrap_or(""));
        push_cell(&mut rows, &number_cell(record.mpg.as_ref()));
        push_cell(&mut rows, &number_cell(record.cyl.as_ref()));
        push_cell(&mut rows, &number_cell(record.hp.as_ref()));
        rows.push_str("</tr>\n");
    }

    if rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut table = String::from("<table>\n<tr>");
    for column in COLUMNS {
        table.push_str(&format!("<th>{column}</th>"));
    }
    table.push_str("</tr>\n");
    table.push_str(&rows);
    table.push_str("</table>");
    table
}

/// Heading followed by the body.
pub fn render<'a, I>(records: I, method: FetchMethod) -> String
where
    I: IntoIterator<Item = &'a CarRecord>,
{
    format!("{}\n{}", render_heading(method), render_body(records))
}

/// Render `records` and overwrite `target` with the result in one write.
///
/// Returns the number of table rows written.
pub fn show<'a, I>(target: &RenderTarget, records: I, method: FetchMethod) -> usize
where
    I: IntoIterator<Item = &'a CarRecord>,
{
    let records: Vec<&CarRecord> = records.into_iter().collect();
    target.replace(render(records.iter().copied(), method));
    records.len()
}

/// The styled error paragraph.
pub fn render_error(error: &dyn Display) -> String {
    format!("<p style=\"color: red;\">Error: {error}</p>")
}

/// Overwrite `target` with the error paragraph, discarding anything already
/// there.
pub fn show_error(target: &RenderTarget, error: &dyn Display) {
    target.replace(render_error(error));
}

fn push_cell(out: &mut String, value: &str) {
    out.push_str("<td>");
    out.push_str(value);
    out.push_str("</td>");
}

/// Integers print as-is. Floats print in shortest round-trip form, so `26.0`
/// is `26`; magnitudes of `1e21` and above or below `1e-6` switch to exponent
/// form with a signed exponent (`1e+21`, `1.5e-7`).
fn number_cell(value: Option<&Number>) -> String {
    match value {
        Some(n) if n.is_f64() => n.as_f64().map(float_cell).unwrap_or_default(),
        Some(n) => n.to_string(),
        None => String::new(),
    }
}

fn float_cell(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude < 1e21 && magnitude >= 1e-6 {
        return f.to_string();
    }

    let sci = format!("{f:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_efficient;
    use crate::types::FetchError;

    #[test]
    fn test_empty_renders_notice_without_table() {
        let html = render(std::iter::empty(), FetchMethod::Callback);
        assert_eq!(
            html,
            "<h2>Fetched using Callback</h2>\n<p>No cars with MPG > 25 found.</p>"
        );
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_fiat_example() {
        let cars = vec![
            CarRecord::new("Fiat X1-9", 27.3, 4, 66),
            CarRecord::new("Merc 450SE", 16.4, 8, 180),
        ];
        let kept = filter_efficient(&cars);
        assert_eq!(kept.len(), 1);

        let html = render(kept, FetchMethod::Promise);
        assert_eq!(
            html,
            "<h2>Fetched using Promise</h2>\n\
             <table>\n\
             <tr><th>Model</th><th>MPG</th><th>Cylinders</th><th>HP</th></tr>\n\
             <tr><td>Fiat X1-9</td><td>27.3</td><td>4</td><td>66</td></tr>\n\
             </table>"
        );
    }

    #[test]
    fn test_body_is_method_independent() {
        let cars = vec![CarRecord::new("Honda Civic", 30.4, 4, 52)];
        let bodies: Vec<String> = FetchMethod::ALL
            .iter()
            .map(|m| {
                let html = render(&cars, *m);
                html.strip_prefix(&render_heading(*m))
                    .unwrap_or_default()
                    .to_string()
            })
            .collect();
        assert_eq!(bodies[0], bodies[1]);
        assert_eq!(bodies[1], bodies[2]);
        assert!(bodies[0].contains("Honda Civic"));
    }

    #[test]
    fn test_missing_fields_render_empty_cells() {
        let car = CarRecord {
            model: Some("Ghost".to_string()),
            mpg: serde_json::Number::from_f64(40.0),
            ..Default::default()
        };
        let body = render_body([&car]);
        assert!(body.contains("<tr><td>Ghost</td><td>40</td><td></td><td></td></tr>"));
    }

    #[test]
    fn test_values_are_not_escaped() {
        let car = CarRecord::new("<b>Bold</b> & Co", 30.0, 4, 100);
        let body = render_body([&car]);
        assert!(body.contains("<td><b>Bold</b> & Co</td>"));
    }

    #[test]
    fn test_integral_float_drops_fraction() {
        let car: CarRecord =
            serde_json::from_str(r#"{"model":"Porsche 914-2","mpg":26.0,"cyl":4,"hp":91}"#)
                .unwrap();
        assert!(render_body([&car]).contains("<td>26</td>"));
    }

    #[test]
    fn test_float_extremes_use_exponent_form() {
        assert_eq!(float_cell(1e21), "1e+21");
        assert_eq!(float_cell(1.5e21), "1.5e+21");
        assert_eq!(float_cell(-2e22), "-2e+22");
        assert_eq!(float_cell(1e-7), "1e-7");
        assert_eq!(float_cell(1.5e-7), "1.5e-7");
        assert_eq!(float_cell(1e20), "100000000000000000000");
        assert_eq!(float_cell(0.000001), "0.000001");
        assert_eq!(float_cell(-0.0), "0");
    }

    #[test]
    fn test_extreme_mpg_cell() {
        let car: CarRecord =
            serde_json::from_str(r#"{"model":"Hyper","mpg":1e21,"cyl":4,"hp":1}"#).unwrap();
        assert!(render_body([&car]).contains("<td>1e+21</td>"));
    }

    #[test]
    fn test_show_overwrites_target() {
        let target = RenderTarget::new();
        target.replace("stale".to_string());
        let cars = vec![CarRecord::new("Lotus Europa", 30.4, 4, 113)];
        let rows = show(&target, &cars, FetchMethod::AsyncAwait);
        assert_eq!(rows, 1);
        let html = target.contents();
        assert!(html.starts_with("<h2>Fetched using Async/Await</h2>"));
        assert!(!html.contains("stale"));
    }

    #[test]
    fn test_show_error_replaces_everything() {
        let target = RenderTarget::new();
        let cars = vec![CarRecord::new("Lotus Europa", 30.4, 4, 113)];
        show(&target, &cars, FetchMethod::Promise);
        show_error(&target, &FetchError::Status(404));
        assert_eq!(
            target.contents(),
            "<p style=\"color: red;\">Error: HTTP Error! Status: 404</p>"
        );
    }
}
