use std::process::Command;

/// Opens the default browser at the given URL (used when
/// `auto_open_browser` is set).
pub fn open_browser(url: &str) {
    let result = {
        #[cfg(target_os = "windows")]
        {
            // Use "cmd /C start" so the URL is handed to the default browser
            Command::new("cmd").args(["/C", "start", "", url]).spawn()
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("open").arg(url).spawn()
        }

        #[cfg(target_os = "linux")]
        {
            Command::new("xdg-open").arg(url).spawn()
        }
    };

    if let Err(e) = result {
        eprintln!("⚠️  Failed to open browser: {}", e);
    }
}
