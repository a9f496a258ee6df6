//! 深度链接解析
//! `musifly://some/path` 映射到站点下的 `some/path`

use url::Url;

/// 计算深度链接对应的站点地址，scheme 不匹配或跳出站点域名时返回 None
pub fn deep_link_target(link: &str, scheme: &str, site: &Url) -> Option<Url> {
    let prefix = format!("{}://", scheme);
    let path = link.strip_prefix(&prefix)?.trim_start_matches('/');

    let target = site.join(path).ok()?;
    if target.scheme() != site.scheme() || target.host_str() != site.host_str() {
        log::warn!("Ignoring deep link outside of {}: {}", site, link);
        return None;
    }

    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://open.musifly.net/").unwrap()
    }

    #[test]
    fn maps_path_onto_site() {
        let target = deep_link_target("musifly://some/path", "musifly", &site()).unwrap();
        assert_eq!(target.as_str(), "https://open.musifly.net/some/path");
    }

    #[test]
    fn keeps_query_string() {
        let target =
            deep_link_target("musifly://album/42?track=3", "musifly", &site()).unwrap();
        assert_eq!(target.as_str(), "https://open.musifly.net/album/42?track=3");
    }

    #[test]
    fn empty_path_opens_site_root() {
        let target = deep_link_target("musifly://", "musifly", &site()).unwrap();
        assert_eq!(target.as_str(), "https://open.musifly.net/");
    }

    #[test]
    fn other_schemes_are_ignored() {
        assert_eq!(deep_link_target("https://open.musifly.net/x", "musifly", &site()), None);
        assert_eq!(deep_link_target("spotify://track/1", "musifly", &site()), None);
    }

    #[test]
    fn cannot_escape_the_site() {
        let target = deep_link_target("musifly:////evil.example/x", "musifly", &site()).unwrap();
        assert_eq!(target.as_str(), "https://open.musifly.net/evil.example/x");
        assert_eq!(
            deep_link_target("musifly://https://evil.example/x", "musifly", &site()),
            None
        );
    }
}
