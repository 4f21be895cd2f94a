//! HTML presentation of a coalesced plan.

use crate::plan::{Field, PlanInfo};

/// Renders the plan info page for `member_id` (`None` when the request did
/// not name a usable member).
pub fn index_page(member_id: Option<i64>, plan: &PlanInfo) -> String {
    let member = match member_id {
        Some(id) => id.to_string(),
        None => "unknown".to_string(),
    };

    let mut rows = String::new();
    for field in Field::ALL {
        rows.push_str(&format!(
            "    <li>{}: {}</li>\n",
            field.label(),
            escape(&plan.get(field).to_string())
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head><meta charset=\"utf-8\"><title>Plan Info</title></head>\n\
         <body>\n\
         <h1>Plan Info</h1>\n\
         <p>Member: {member}</p>\n\
         <ul>\n\
         {rows}\
         </ul>\n\
         </body>\n\
         </html>\n"
    )
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
