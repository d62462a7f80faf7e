//! Supported coding platforms and username normalization.

use reqwest::Url;
use serde::Serialize;

/// A platform users can link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub connect_url: &'static str,
}

pub const CODING_PLATFORMS: &[PlatformInfo] = &[
    PlatformInfo {
        id: "leetcode",
        name: "LeetCode",
        category: "Competitive",
        connect_url: "https://leetcode.com",
    },
    PlatformInfo {
        id: "hackerrank",
        name: "HackerRank",
        category: "Interview Prep",
        connect_url: "https://www.hackerrank.com",
    },
    PlatformInfo {
        id: "codeforces",
        name: "Codeforces",
        category: "Competitive",
        connect_url: "https://codeforces.com",
    },
    PlatformInfo {
        id: "geeksforgeeks",
        name: "GeeksforGeeks",
        category: "Interview Prep",
        connect_url: "https://www.geeksforgeeks.org",
    },
    PlatformInfo {
        id: "codechef",
        name: "CodeChef",
        category: "Competitive",
        connect_url: "https://www.codechef.com",
    },
    PlatformInfo {
        id: "atcoder",
        name: "AtCoder",
        category: "Competitive",
        connect_url: "https://atcoder.jp",
    },
    PlatformInfo {
        id: "topcoder",
        name: "TopCoder",
        category: "Competitive",
        connect_url: "https://www.topcoder.com",
    },
];

pub fn find(id: &str) -> Option<&'static PlatformInfo> {
    CODING_PLATFORMS.iter().find(|p| p.id == id)
}

/// Reduce user input to a bare username.
///
/// Input is trimmed. For LeetCode, a pasted profile URL
/// (`https://leetcode.com/u/alice/`, `leetcode.com/alice`) becomes its last
/// path segment; input that doesn't parse as a URL is returned trimmed.
pub fn extract_platform_username(input: &str, platform_id: &str) -> String {
    let trimmed = input.trim();
    if platform_id != "leetcode" || !trimmed.contains("leetcode.com") {
        return trimmed.to_string();
    }

    let candidate = if trimmed.starts_with("http") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        Err(_) => trimmed.to_string(),
    }
}
