/// Best-effort voice output. `speak` returns immediately and never fails;
/// synthesis and playback happen in the background.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str);
}
