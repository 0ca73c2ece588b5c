/// Render remaining seconds as `MM:SS`.
///
/// Minutes are not rolled over into hours, so 90 minutes reads `90:00`.
pub fn format_remaining(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
