/// 百度百科站点常量
///
/// 该文件集中定义站点地址、页面标记类名和浏览器相关常量。
/// 这些类名直接取自站点的页面结构，站点改版时需要同步更新。

/// 站点地址配置
pub mod site {
    /// 站点根地址
    pub const BASE_URL: &str = "http://baike.baidu.com";

    /// 词条查询路径
    pub const SEARCH_WORD_PATH: &str = "/search/word";

    /// 搜索列表路径
    pub const SEARCH_PATH: &str = "/search";

    /// 词条未收录时页面中出现的文字
    pub const NOT_FOUND_TEXT: &str = "百度百科尚未收录词条";

    /// 人机验证页面的标记元素id
    pub const VERIFY_ID: &str = "vf";

    /// 标题与站点后缀之间的分隔符
    pub const TITLE_SEPARATOR: char = '_';

    /// 词条内部链接的href模式
    pub const VIEW_HREF_PATTERN: &str = r"/(sub)?view(/[0-9]*)+.htm";

    /// 直接访问词条页面的URL模式
    pub const PAGE_URL_PATTERN: &str = r"(?i)^https?://baike\.baidu\.com/.*";
}

/// 页面标记类名
pub mod markers {
    /// 多义词消歧页面
    pub const DISAMBIGUATION: &[&str] = &["nslog:519"];

    /// 词条创建者
    pub const CREATOR: &[&str] = &["nslog:1022"];

    /// 参考资料
    pub const REFERENCE: &[&str] = &["nslog:1968"];

    /// 词条标签
    pub const TAG: &[&str] = &["nslog:7336", "taglist"];

    /// 正文标题
    pub const TITLE_H1: &str = "lemmaTitleH1";

    /// 一级目录
    pub const HEADLINE_1: &str = "headline-1";

    /// 二级目录
    pub const HEADLINE_2: &str = "headline-2";

    /// 正文段落
    pub const PARA: &str = "para";

    /// 正文内容（按优先级排列）
    pub const CONTENT: &[&str] = &[TITLE_H1, HEADLINE_1, HEADLINE_2, PARA];

    /// 词条摘要
    pub const SUMMARY: &[&str] = &["lemmaSummary__tEeY J-summary"];

    /// 同义词面板
    pub const SYNONYM: &[&str] = &["lemmaSynonym"];

    /// 同义词面板中的标签文字
    pub const SYNONYM_LABEL: &str = "同义词";

    /// 搜索结果页的候选词条标题
    pub const CANDIDATE_TITLE: &[&str] = &["result-title"];

    /// 搜索结果页的结果数量提示
    pub const RESULT_COUNT: &[&str] = &["result-count"];

    /// 搜索列表中的结果项
    pub const SEARCH_ITEM: &[&str] = &["f"];

    /// 搜索列表中的结果描述
    pub const SEARCH_ABSTRACT: &[&str] = &["abstract"];

    /// 浏览量元素id
    pub const PAGE_VIEW_ID: &str = "viewPV";

    /// 最后修改时间元素id
    pub const LAST_MODIFY_ID: &str = "lastModifyTime";
}

/// 抓取配置
pub mod crawler_config {
    /// 默认请求超时时间（秒）
    pub const DEFAULT_TIMEOUT: u64 = 30;

    /// 桌面浏览器User-Agent
    pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36";

    /// 搜索列表默认每页结果数
    pub const DEFAULT_RESULTS_PER_PAGE: usize = 10;
}

/// 浏览器自动化配置
pub mod browser_config {
    /// 等待元素出现的默认超时时间（秒）
    pub const DEFAULT_WAIT_TIMEOUT: u64 = 10;

    /// 等待元素时的轮询间隔（毫秒）
    pub const POLL_INTERVAL_MS: u64 = 250;

    /// 搜索输入框选择器
    pub const SEARCH_INPUT_SELECTOR: &str = "input[name=\"word\"]";

    /// 隐藏自动化特征的启动参数
    pub const STEALTH_ARGS: &[&str] = &[
        "--disable-blink-features=AutomationControlled",
        "--disable-dev-shm-usage",
        "--no-first-run",
        "--no-default-browser-check",
    ];
}

/// 代理池配置
pub mod proxy_config {
    /// 代理池地址的环境变量名
    pub const PROXY_ENV_VAR: &str = "BAIKE_PROXY";

    /// 代理池默认地址
    pub const DEFAULT_PROXY_DIRECTORY: &str = "192.168.3.224:5555";

    /// 随机代理接口路径
    pub const RANDOM_PATH: &str = "/random";
}

/// 判断输入是否为可直接访问的词条URL
pub fn is_page_url(input: &str) -> bool {
    regex::Regex::new(site::PAGE_URL_PATTERN)
        .map(|re| re.is_match(input))
        .unwrap_or(false)
}

/// 将类名标记转换为CSS选择器
///
/// 含空格的标记表示多个类名同时存在，例如 `"a b"` 转换为 `.a.b`。
/// 类名中的冒号需要转义。
pub fn class_selector(marker: &str) -> String {
    marker
        .split_whitespace()
        .map(|class| format!(".{}", class.replace(':', "\\:")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_detection() {
        assert!(is_page_url("http://baike.baidu.com/item/Rust"));
        assert!(is_page_url("HTTP://BAIKE.BAIDU.COM/view/1.htm"));
        assert!(is_page_url("https://baike.baidu.com/item/Rust"));
        assert!(!is_page_url("Rust"));
        assert!(!is_page_url("http://example.com/baike.baidu.com/"));
    }

    #[test]
    fn test_class_selector() {
        assert_eq!(class_selector("result-count"), ".result-count");
        assert_eq!(
            class_selector("lemmaSummary__tEeY J-summary"),
            ".lemmaSummary__tEeY.J-summary"
        );
        assert_eq!(class_selector("nslog:519"), ".nslog\\:519");
    }

    #[test]
    fn test_stealth_args_are_chrome_switches() {
        let args = browser_config::STEALTH_ARGS;
        assert!(args.contains(&"--disable-blink-features=AutomationControlled"));
        // chromedriver专用的选项传给Chrome不会生效
        assert!(args.iter().all(|arg| !arg.starts_with("--exclude-switches")));
        assert!(args.iter().all(|arg| arg.starts_with("--")));
    }
}
