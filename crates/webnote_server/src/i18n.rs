//! Language negotiation and UI strings.

use axum::http::{header, HeaderMap};

/// Supported UI languages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// Pick a language from an `Accept-Language` value.
    ///
    /// Entries are tried in descending `q` order; the first supported
    /// primary subtag wins. Unsupported or missing headers give English.
    pub fn negotiate(accept_language: Option<&str>) -> Self {
        let Some(raw) = accept_language else {
            return Lang::default();
        };
        let mut ranges: Vec<(&str, f32)> = raw
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let tag = pieces.next()?.trim();
                if tag.is_empty() {
                    return None;
                }
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((tag, q))
            })
            .collect();
        ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranges
            .into_iter()
            .filter(|(_, q)| *q > 0.0)
            .find_map(|(tag, _)| Self::from_tag(tag))
            .unwrap_or_default()
    }

    /// Negotiate from request headers.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::negotiate(
            headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|value| value.to_str().ok()),
        )
    }

    fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split('-').next().unwrap_or(tag);
        if primary.eq_ignore_ascii_case("zh") {
            Some(Lang::Zh)
        } else if primary.eq_ignore_ascii_case("en") {
            Some(Lang::En)
        } else {
            None
        }
    }

    /// Value for the `<html lang>` attribute.
    pub fn html_tag(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh-CN",
        }
    }

    /// Look up a UI string.
    pub fn text(self, msg: Msg) -> &'static str {
        match self {
            Lang::En => msg.en(),
            Lang::Zh => msg.zh(),
        }
    }
}

/// UI strings shown by the page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Placeholder,
    Saved,
    SaveFailed,
    Password,
    SetPassword,
    PasswordPrompt,
    Unlock,
    Share,
    Markdown,
    Directory,
    NewNote,
    NoNotes,
    LastUpdated,
    Protected,
    Shared,
    NotFound,
    ErrorOccurred,
    BackHome,
}

impl Msg {
    fn en(self) -> &'static str {
        match self {
            Msg::Placeholder => "Start typing, changes are saved automatically.",
            Msg::Saved => "Saved",
            Msg::SaveFailed => "Save failed",
            Msg::Password => "Password",
            Msg::SetPassword => "Set password (leave empty to remove)",
            Msg::PasswordPrompt => "This note is password protected.",
            Msg::Unlock => "Unlock",
            Msg::Share => "Share",
            Msg::Markdown => "Markdown",
            Msg::Directory => "All notes",
            Msg::NewNote => "New note",
            Msg::NoNotes => "No notes yet.",
            Msg::LastUpdated => "Last updated",
            Msg::Protected => "Protected",
            Msg::Shared => "Shared",
            Msg::NotFound => "Nothing here.",
            Msg::ErrorOccurred => "Something went wrong. Please try again later.",
            Msg::BackHome => "Back to home",
        }
    }

    fn zh(self) -> &'static str {
        match self {
            Msg::Placeholder => "开始输入，内容会自动保存。",
            Msg::Saved => "已保存",
            Msg::SaveFailed => "保存失败",
            Msg::Password => "密码",
            Msg::SetPassword => "设置密码（留空则移除）",
            Msg::PasswordPrompt => "此笔记受密码保护。",
            Msg::Unlock => "解锁",
            Msg::Share => "分享",
            Msg::Markdown => "Markdown",
            Msg::Directory => "全部笔记",
            Msg::NewNote => "新建笔记",
            Msg::NoNotes => "还没有笔记。",
            Msg::LastUpdated => "最后更新",
            Msg::Protected => "已加密",
            Msg::Shared => "已分享",
            Msg::NotFound => "这里什么也没有。",
            Msg::ErrorOccurred => "出错了，请稍后再试。",
            Msg::BackHome => "返回首页",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Lang, Msg};

    #[test]
    fn negotiate_matrix() {
        let cases = [
            (None, Lang::En),
            (Some(""), Lang::En),
            (Some("zh-CN,zh;q=0.9,en;q=0.8"), Lang::Zh),
            (Some("en-US,en;q=0.9"), Lang::En),
            (Some("fr-FR, zh;q=0.5, en;q=0.4"), Lang::Zh),
            (Some("en;q=0.2, zh-TW;q=0.8"), Lang::Zh),
            (Some("zh;q=0, de"), Lang::En),
            (Some("de, fr"), Lang::En),
        ];
        for (header, expected) in cases {
            assert_eq!(Lang::negotiate(header), expected, "header: {:?}", header);
        }
    }

    #[test]
    fn every_message_has_both_languages() {
        for msg in [Msg::Placeholder, Msg::NotFound, Msg::Unlock, Msg::Directory] {
            assert!(!Lang::En.text(msg).is_empty());
            assert!(!Lang::Zh.text(msg).is_empty());
        }
    }
}
