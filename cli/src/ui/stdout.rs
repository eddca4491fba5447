use threadwatch::notify::Notifier;
use threadwatch::WatchError;

/// Prints notifications instead of delivering them.
pub struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, message: &str) -> Result<(), WatchError> {
        println!("{message}");

        Ok(())
    }
}
