//! Checklist source text from an item table and checklist tree

use crate::ast::{AbstractSyntaxTree, Check, CheckKind, ItemTable, Page};

const INDENT: &str = "    ";

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

fn write_check(out: &mut String, check: &Check, indent: &str) {
    let line = match &check.kind {
        CheckKind::Spacer => "text();".to_string(),
        CheckKind::Subtitle(text) => format!("text({});", quoted(text)),
        CheckKind::Normal { item, state } => {
            let mut args = vec![quoted(&item.name), quoted(&state.name)];
            args.extend(check.additional_values.iter().map(|value| quoted(value)));
            format!("check({});", args.join(", "))
        }
    };
    out.push_str(indent);
    out.push_str(&line);
    out.push('\n');
}

fn write_page(out: &mut String, page: &Page) {
    if page.implicit {
        for check in &page.checks {
            write_check(out, check, INDENT);
        }
        return;
    }
    out.push_str(&format!("{}page {{\n", INDENT));
    let nested = INDENT.repeat(2);
    for check in &page.checks {
        write_check(out, check, &nested);
    }
    out.push_str(&format!("{}}}\n", INDENT));
}

/// Items first, in table order, then checklists
pub fn emit_source(items: &ItemTable, tree: &AbstractSyntaxTree) -> String {
    let mut out = String::new();
    if let Some(project) = &tree.project {
        out.push_str(&format!("project({});\n", quoted(project)));
    }
    if let Some(author) = &tree.author {
        out.push_str(&format!("author({});\n", quoted(author)));
    }

    for item in items.iter() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("item({}) {{\n", quoted(&item.name)));
        for state in item.states() {
            out.push_str(&format!("{}state({});\n", INDENT, quoted(&state.name)));
        }
        if let Some(marker) = &item.marker {
            let c = marker.coordinate;
            out.push_str(&format!(
                "{}marker({:?}, {:?}, {:?}, {:?});\n",
                INDENT, c.x, c.y, c.z, marker.scale
            ));
        }
        out.push_str("}\n");
    }

    for checklist in &tree.checklists {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&format!("checklist({}) {{\n", quoted(&checklist.title)));
        for page in &checklist.pages {
            write_page(&mut out, page);
        }
        out.push_str("}\n");
    }
    out
}
