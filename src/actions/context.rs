use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

#[derive(Clone, Debug)]
pub struct Context {
	pub progress: MultiProgress,
}

impl Context {
	pub fn new() -> Self {
		Self {
			progress: MultiProgress::new(),
		}
	}

	pub fn data_bar(&self, len: u64) -> ProgressBar {
		self.progress.add(ProgressBar::new(len).with_style(
			ProgressStyle::default_bar()
				.template("[{bar:.cyan/blue}] {wide_msg} {bytes}/{total_bytes} [{bytes_per_sec}] ({eta})")
				.expect("data bar template invalid")
		))
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}
