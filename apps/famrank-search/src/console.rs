use std::fmt::Write;

use famrank_service::{ResultSource, SearchState};

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
	Search(&'a str),
	Clear,
	Quit,
}
impl<'a> Command<'a> {
	pub fn parse(line: &'a str) -> Self {
		match line.trim() {
			":clear" => Self::Clear,
			":quit" | ":q" => Self::Quit,
			_ => Self::Search(line),
		}
	}
}

pub fn render(state: &SearchState) -> String {
	let mut out = String::new();

	if state.loading {
		out.push_str("searching...\n");

		return out;
	}
	if let Some(error) = &state.error {
		let _ = writeln!(out, "error: {error}");
	}

	match state.source {
		Some(ResultSource::Index) => out.push_str("-- index --\n"),
		Some(ResultSource::Datastore) => out.push_str("-- datastore (index unavailable) --\n"),
		None => {},
	}

	if state.results.is_empty() && state.error.is_none() {
		out.push_str("(no results)\n");
	}

	for result in &state.results {
		let _ = writeln!(
			out,
			"{:>3}  {:<7}  {}  [{}]",
			result.score,
			result.relevance.as_str(),
			result.profile.display_name,
			result.profile.uid,
		);
	}

	out
}
