//! # テンプレートロケーター
//!
//! テンプレート識別子を本文テンプレートのテキストに解決する。
//!
//! ## 解決順序
//!
//! 1. **ファイルシステム**: 識別子が既存のパスを指していれば UTF-8 で読み込む。
//!    `file:` 接頭辞（`file:/path`、`file:///path`）は取り除いてパスとして扱い、
//!    `classpath:` で始まる識別子はファイルとして扱わない
//! 2. **同梱リソース**: `include_str!` でバイナリに埋め込んだテンプレート
//!    （`classpath:` 接頭辞と先頭の `/` は無視する）
//! 3. **組み込みリテラル**: [`BUILTIN_DEFAULT_TEMPLATE`]
//!
//! 各段は `Option<TemplateSource>` を返す関数で、最初に `Some` を返した段の結果を使う。
//! 読み込み中の I/O エラーは warn ログを出して次の段に進む。呼び出し元に伝播するのは
//! 識別子が未設定（`None`）の場合の [`NotificationError::InvalidArgument`] のみ。

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use marketplace_notifier_domain::NotificationError;
use marketplace_notifier_shared::event_log::error;

/// 付与通知の同梱テンプレート識別子
pub const DEFAULT_SUBSCRIBE_TEMPLATE: &str = "classpath:templates/access-granted.mustache";

/// 取り消し通知の同梱テンプレート識別子
pub const DEFAULT_UNSUBSCRIBE_TEMPLATE: &str = "classpath:templates/access-revoked.mustache";

const RESOURCE_PREFIX: &str = "classpath:";
const FILE_PREFIX: &str = "file:";

/// ファイルもリソースも見つからない場合に使うテンプレート
pub const BUILTIN_DEFAULT_TEMPLATE: &str = "\
Hello {{data.request.requester.identifier}},

This is a notification about your access to the following data product:

  Data product: {{data.request.provider.dataProductFqn}}
  Valid from:   {{data.request.startDate}}
  Valid until:  {{data.request.endDate}}
  Consumer:     {{data.request.consumer.identifier}}

This message was generated automatically by the Open Data Mesh marketplace.
";

const BUNDLED_RESOURCES: &[(&str, &str)] = &[
    (
        "templates/access-granted.mustache",
        include_str!("../templates/access-granted.mustache"),
    ),
    (
        "templates/access-revoked.mustache",
        include_str!("../templates/access-revoked.mustache"),
    ),
];

/// テンプレートの解決結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// ファイルシステム上のファイルから読み込んだ
    FoundOnDisk { path: PathBuf, text: String },
    /// 同梱リソースから読み込んだ
    FoundAsResource { name: String, text: String },
    /// 組み込みリテラルを使った
    UsedBuiltinDefault { text: String },
}

impl TemplateSource {
    pub fn text(&self) -> &str {
        match self {
            Self::FoundOnDisk { text, .. }
            | Self::FoundAsResource { text, .. }
            | Self::UsedBuiltinDefault { text } => text.as_str(),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::FoundOnDisk { text, .. }
            | Self::FoundAsResource { text, .. }
            | Self::UsedBuiltinDefault { text } => text,
        }
    }

    /// ログ出力用の解決元名
    pub fn origin(&self) -> &'static str {
        match self {
            Self::FoundOnDisk { .. } => "disk",
            Self::FoundAsResource { .. } => "resource",
            Self::UsedBuiltinDefault { .. } => "builtin",
        }
    }
}

type Resolver = fn(&TemplateLocator, &str) -> Option<TemplateSource>;

/// テンプレートロケーター
///
/// 状態はリソース表のみで、解決は毎回ファイルシステムを読み直す。
/// 複数タスクから同時に呼び出してよい。
#[derive(Debug, Clone)]
pub struct TemplateLocator {
    resources: HashMap<String, String>,
}

impl TemplateLocator {
    /// 同梱テンプレートを登録したロケーターを作成する
    pub fn new() -> Self {
        Self::with_resources(
            BUNDLED_RESOURCES
                .iter()
                .map(|(name, text)| (name.to_string(), text.to_string())),
        )
    }

    /// 任意のリソース表でロケーターを作成する
    ///
    /// リソース名は `classpath:` 接頭辞なしで登録する。
    pub fn with_resources(
        resources: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        Self {
            resources: resources
                .into_iter()
                .map(|(name, text)| (name.into(), text.into()))
                .collect(),
        }
    }

    /// テンプレート識別子をテンプレートテキストに解決する
    ///
    /// `Some` の識別子（空文字を含む）に対しては必ず成功する。
    pub fn resolve(&self, identifier: Option<&str>) -> Result<TemplateSource, NotificationError> {
        let Some(identifier) = identifier else {
            return Err(NotificationError::InvalidArgument(
                "テンプレート識別子が設定されていません".to_string(),
            ));
        };

        const RESOLVERS: [Resolver; 2] = [
            TemplateLocator::probe_file_system,
            TemplateLocator::probe_resources,
        ];

        let source = RESOLVERS
            .iter()
            .find_map(|resolve| resolve(self, identifier))
            .unwrap_or_else(|| {
                tracing::warn!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::TEMPLATE_NOT_FOUND,
                    template = identifier,
                    "テンプレートが見つからないため組み込みテンプレートを使用します"
                );
                TemplateSource::UsedBuiltinDefault {
                    text: BUILTIN_DEFAULT_TEMPLATE.to_string(),
                }
            });

        tracing::debug!(
            template = identifier,
            origin = source.origin(),
            "テンプレートを解決しました"
        );
        Ok(source)
    }

    fn probe_file_system(&self, identifier: &str) -> Option<TemplateSource> {
        if identifier.is_empty() || identifier.starts_with(RESOURCE_PREFIX) {
            return None;
        }

        let path = Path::new(strip_file_prefix(identifier));
        match path.try_exists() {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(template = identifier, "テンプレートファイルが存在しません");
                return None;
            }
            Err(e) => {
                tracing::warn!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::TEMPLATE_IO,
                    template = identifier,
                    error = %e,
                    "テンプレートファイルの存在確認に失敗"
                );
                return None;
            }
        }

        let text = fs::read(path)
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));

        match text {
            Ok(text) => Some(TemplateSource::FoundOnDisk {
                path: path.to_path_buf(),
                text,
            }),
            Err(e) => {
                tracing::warn!(
                    error.category = error::category::INFRASTRUCTURE,
                    error.kind = error::kind::TEMPLATE_IO,
                    template = identifier,
                    error = %e,
                    "テンプレートファイルの読み込みに失敗"
                );
                None
            }
        }
    }

    fn probe_resources(&self, identifier: &str) -> Option<TemplateSource> {
        let name = identifier
            .strip_prefix(RESOURCE_PREFIX)
            .unwrap_or(identifier)
            .trim_start_matches('/');

        match self.resources.get(name) {
            Some(text) => Some(TemplateSource::FoundAsResource {
                name: name.to_string(),
                text: text.clone(),
            }),
            None => {
                tracing::warn!(
                    template = identifier,
                    "同梱テンプレートリソースが見つかりません"
                );
                None
            }
        }
    }
}

/// `file:` 形式の識別子をファイルパスに変換する
fn strip_file_prefix(identifier: &str) -> &str {
    match identifier.strip_prefix(FILE_PREFIX) {
        Some(rest) if rest.starts_with("///") => &rest[2..],
        Some(rest) => rest,
        None => identifier,
    }
}

impl Default for TemplateLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn write_template(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn 識別子がnoneの場合invalid_argumentを返す() {
        let locator = TemplateLocator::new();

        let result = locator.resolve(None);

        assert!(matches!(result, Err(NotificationError::InvalidArgument(_))));
    }

    #[rstest]
    #[case("")]
    #[case("/nonexistent/path/template.mustache")]
    #[case("classpath:templates/missing.mustache")]
    #[case("not a path \u{0}")]
    fn 見つからない識別子は組み込みテンプレートに解決される(#[case] identifier: &str) {
        let locator = TemplateLocator::new();

        let source = locator.resolve(Some(identifier)).unwrap();

        assert_eq!(
            source,
            TemplateSource::UsedBuiltinDefault {
                text: BUILTIN_DEFAULT_TEMPLATE.to_string(),
            }
        );
        assert_eq!(source.origin(), "builtin");
    }

    #[test]
    fn ファイルが存在する場合その内容を返す() {
        let file = write_template("Hi {{data.name}} – ünïcode\n".as_bytes());
        let identifier = file.path().to_str().unwrap();
        let locator = TemplateLocator::new();

        let source = locator.resolve(Some(identifier)).unwrap();

        assert_eq!(
            source,
            TemplateSource::FoundOnDisk {
                path: file.path().to_path_buf(),
                text: "Hi {{data.name}} – ünïcode\n".to_string(),
            }
        );
    }

    #[test]
    fn ファイルは同名のリソースより優先される() {
        let file = write_template(b"from disk");
        let identifier = file.path().to_str().unwrap().to_string();
        let locator = TemplateLocator::with_resources([(
            identifier.trim_start_matches('/').to_string(),
            "from resource".to_string(),
        )]);

        let source = locator.resolve(Some(&identifier)).unwrap();

        assert_eq!(source.text(), "from disk");
        assert_eq!(source.origin(), "disk");
    }

    #[test]
    fn utf8でないファイルはリソースにフォールバックする() {
        let file = write_template(&[0xff, 0xfe, 0xfd]);
        let identifier = file.path().to_str().unwrap().to_string();
        let locator = TemplateLocator::with_resources([(
            identifier.trim_start_matches('/').to_string(),
            "from resource".to_string(),
        )]);

        let source = locator.resolve(Some(&identifier)).unwrap();

        assert_eq!(source.text(), "from resource");
    }

    #[test]
    fn ディレクトリを指す識別子は組み込みテンプレートにフォールバックする() {
        let dir = tempfile::tempdir().unwrap();
        let locator = TemplateLocator::with_resources(Vec::<(String, String)>::new());

        let source = locator
            .resolve(Some(dir.path().to_str().unwrap()))
            .unwrap();

        assert_eq!(source.text(), BUILTIN_DEFAULT_TEMPLATE);
    }

    #[rstest]
    #[case(DEFAULT_SUBSCRIBE_TEMPLATE, "has been processed")]
    #[case(DEFAULT_UNSUBSCRIBE_TEMPLATE, "has been terminated")]
    #[case("/templates/access-granted.mustache", "has been processed")]
    #[case("/templates/access-revoked.mustache", "has been terminated")]
    fn 同梱テンプレートを識別子で解決できる(#[case] identifier: &str, #[case] expected: &str) {
        let locator = TemplateLocator::new();

        let source = locator.resolve(Some(identifier)).unwrap();

        assert!(matches!(source, TemplateSource::FoundAsResource { .. }));
        assert!(source.text().contains(expected), "{}", source.text());
    }

    #[rstest]
    #[case("file:")]
    #[case("file://")]
    fn file接頭辞付きの識別子はファイルとして読み込む(#[case] prefix: &str) {
        let file = write_template(b"from file url");
        let identifier = format!("{prefix}{}", file.path().to_str().unwrap());
        let locator = TemplateLocator::new();

        let source = locator.resolve(Some(&identifier)).unwrap();

        assert_eq!(
            source,
            TemplateSource::FoundOnDisk {
                path: file.path().to_path_buf(),
                text: "from file url".to_string(),
            }
        );
    }

    #[test]
    fn 存在しないfile識別子は組み込みテンプレートに解決される() {
        let locator = TemplateLocator::new();

        let source = locator
            .resolve(Some("file:/nonexistent/path/template.mustache"))
            .unwrap();

        assert_eq!(source.origin(), "builtin");
    }

    #[rstest]
    #[case("file:/etc/odm/a.mustache", "/etc/odm/a.mustache")]
    #[case("file:///etc/odm/a.mustache", "/etc/odm/a.mustache")]
    #[case("/etc/odm/a.mustache", "/etc/odm/a.mustache")]
    #[case("relative/a.mustache", "relative/a.mustache")]
    fn file接頭辞を取り除いたパスを返す(#[case] identifier: &str, #[case] expected: &str) {
        assert_eq!(strip_file_prefix(identifier), expected);
    }

    #[test]
    fn into_textは解決したテキストを返す() {
        let locator = TemplateLocator::with_resources([("a.mustache", "A")]);

        let text = locator.resolve(Some("a.mustache")).unwrap().into_text();

        assert_eq!(text, "A");
    }

    #[test]
    fn 同じ識別子は何度解決しても同じ結果になる() {
        let locator = TemplateLocator::new();

        let first = locator.resolve(Some(DEFAULT_SUBSCRIBE_TEMPLATE)).unwrap();
        let second = locator.resolve(Some(DEFAULT_SUBSCRIBE_TEMPLATE)).unwrap();

        assert_eq!(first, second);
    }
}
