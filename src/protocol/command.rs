#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Ping,
    PlatformLocales,
    ResourceParse,
    DetectEncoding,
    CheckSnapshots,
    VerifyExtraction,
    Unknown,
}

impl From<&str> for Command {
    fn from(s: &str) -> Self {
        match s {
            "ping" => Command::Ping,
            "platform.locales" => Command::PlatformLocales,
            "resource.parse" => Command::ResourceParse,
            "encoding.detect" | "detect_encoding" => Command::DetectEncoding,
            "check.snapshots" | "check" => Command::CheckSnapshots,
            "extraction.verify" => Command::VerifyExtraction,
            _ => Command::Unknown,
        }
    }
}
