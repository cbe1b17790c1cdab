// HTML pages for the web interface.
//
// Plain string rendering; every piece of user text goes through `escape`.

use crate::inventory::{Inventory, InventorySummary};
use crate::registry::{RegistryEntry, StorageId};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem auto; max-width: 56rem; color: #222; }
table { border-collapse: collapse; width: 100%; }
th, td { border-bottom: 1px solid #ddd; padding: .5rem; text-align: left; }
th { background: #f4f4f4; }
.bar { background: #eee; height: .75rem; width: 10rem; }
.fill { background: #3a7; height: 100%; }
form.inline { display: inline; }
fieldset { margin-bottom: 1rem; }
"#;

/// Escape text for use in element content and quoted attributes
pub fn escape(text: &str) -> String {
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

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

fn fill_percent(entry: &RegistryEntry) -> f64 {
    let capacity = entry.storage.capacity();
    if capacity <= 0.0 {
        return 0.0;
    }
    (entry.storage.balance() / capacity * 100.0).clamp(0.0, 100.0)
}

fn storage_row(entry: &RegistryEntry) -> String {
    format!(
        r#"<tr>
<td>{name}</td>
<td>{balance:.2}</td>
<td>{capacity:.2}</td>
<td>{space:.2}</td>
<td><div class="bar"><div class="fill" style="width: {fill:.0}%"></div></div></td>
<td>
<a href="/edit/{id}">Edit</a>
<form class="inline" method="post" action="/delete/{id}"><button type="submit">Delete</button></form>
</td>
</tr>"#,
        id = entry.id,
        name = escape(&entry.name),
        balance = entry.storage.balance(),
        capacity = entry.storage.capacity(),
        space = entry.storage.available_space(),
        fill = fill_percent(entry),
    )
}

fn summary_line(summary: &InventorySummary) -> String {
    format!(
        "<p>{} storages, {:.2} of {:.2} in use, {:.2} free</p>",
        summary.storages, summary.total_balance, summary.total_capacity, summary.total_available
    )
}

/// GET /
pub fn index_page(inventory: &Inventory) -> String {
    let entries = inventory.registry().list_all();

    let listing = if entries.is_empty() {
        "<p>No storages yet.</p>".to_string()
    } else {
        let rows: Vec<String> = entries.values().map(storage_row).collect();
        format!(
            "<table>\n<tr><th>Name</th><th>Balance</th><th>Capacity</th><th>Space left</th><th>Fill</th><th></th></tr>\n{}\n</table>\n{}",
            rows.join("\n"),
            summary_line(&inventory.summary()),
        )
    };

    let body = format!(
        "<h1>Warehouse Management</h1>\n<p><a href=\"/create\">Create Storage</a></p>\n{}",
        listing
    );
    layout("Warehouse Management", &body)
}

/// GET /create
pub fn create_page() -> String {
    let body = r#"<h1>Create New Storage</h1>
<form method="post" action="/create">
<p><label>Name <input type="text" name="name" required></label></p>
<p><label>Capacity <input type="number" name="tilavuus" step="any" min="0" required></label></p>
<p><label>Initial balance <input type="number" name="alku_saldo" step="any" min="0" value="0"></label></p>
<p><button type="submit">Create</button> <a href="/">Cancel</a></p>
</form>"#;
    layout("Create New Storage", body)
}

/// GET /edit/:id
pub fn edit_page(id: StorageId, entry: &RegistryEntry) -> String {
    let body = format!(
        r#"<h1>Edit Storage</h1>
<h2>{name}</h2>
<p>Balance {balance:.2} / {capacity:.2}, space left {space:.2}</p>
<fieldset>
<legend>Rename</legend>
<form method="post" action="/edit/{id}">
<input type="hidden" name="action" value="update">
<input type="text" name="name" value="{name}" required>
<button type="submit">Save</button>
</form>
</fieldset>
<fieldset>
<legend>Add</legend>
<form method="post" action="/edit/{id}">
<input type="hidden" name="action" value="add">
<input type="number" name="amount" step="any" min="0">
<button type="submit">Add</button>
</form>
</fieldset>
<fieldset>
<legend>Remove</legend>
<form method="post" action="/edit/{id}">
<input type="hidden" name="action" value="remove">
<input type="number" name="amount" step="any" min="0">
<button type="submit">Remove</button>
</form>
</fieldset>
<form method="post" action="/delete/{id}"><button type="submit">Delete storage</button></form>
<p><a href="/">Back to list</a></p>"#,
        id = id,
        name = escape(&entry.name),
        balance = entry.storage.balance(),
        capacity = entry.storage.capacity(),
        space = entry.storage.available_space(),
    );
    layout("Edit Storage", &body)
}

// ============================================================================
// TESTS
// ============================================================================
