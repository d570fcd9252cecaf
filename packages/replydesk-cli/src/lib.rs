use clap::builder::{
	Styles,
	styling::{AnsiColor, Effects},
};

/// Version string shared by every replydesk binary: crate version, git sha, target triple.
pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	"-",
	env!("VERGEN_GIT_SHA"),
	"-",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
);

pub fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Green.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Yellow.on_default())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn version_starts_with_crate_version() {
		assert!(VERSION.starts_with(env!("CARGO_PKG_VERSION")));
	}
}
