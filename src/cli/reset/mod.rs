//! Reset-session command

use crate::infrastructure::session_file::SessionFile;

/// Delete the marker file so the next invocation starts a new session
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();
    let marker = SessionFile::new(&config.session.marker_file);

    if marker.delete().await? {
        println!("Session reset.");
    } else {
        println!("No session to reset.");
    }

    Ok(())
}
