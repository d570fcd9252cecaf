pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_businesses.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_businesses.sql")),
				"tables/002_leads.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_leads.sql")),
				"tables/003_conversations.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_conversations.sql")),
				"tables/004_messages.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_messages.sql")),
				"tables/005_templates.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_templates.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}
