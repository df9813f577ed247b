use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, io::IsTerminal, time::Duration};

const TICK_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Awaits `work` while a spinner with `msg` runs on stderr, then clears the line.
/// Draws nothing when `enabled` is false or stderr isn't a TTY.
pub async fn with_spinner<Fut>(msg: impl Into<String>, enabled: bool, work: Fut) -> Fut::Output
where
    Fut: Future,
{
    let pb = if enabled && std::io::stderr().is_terminal() {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);
        pb.set_style(style);
        pb.set_message(msg.into());
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    // Clears the spinner line however `work` finishes
    struct Guard(Option<ProgressBar>);
    impl Drop for Guard {
        fn drop(&mut self) {
            if let Some(pb) = self.0.take() {
                pb.finish_and_clear();
            }
        }
    }
    let _guard = Guard(pb);

    work.await
}
