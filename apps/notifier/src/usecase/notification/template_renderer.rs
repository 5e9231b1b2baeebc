//! # テンプレートレンダラー
//!
//! handlebars テンプレートエンジンで通知メールの本文を生成する。
//!
//! ## 設計方針
//!
//! - **mustache 互換**: `{{field}}`、`{{a.b.c}}` のドット区切り参照に加えて、
//!   セクション `{{#a}}...{{/a}}` と反転セクション `{{^a}}...{{/a}}` を受け付ける。
//!   セクションはコンパイル前にブロックヘルパー呼び出しへ書き換える（[`mustache`] 参照）
//! - **非 strict モード**: コンテキストに存在しないフィールドは空文字に置換される
//! - **コンパイルと実行の分離**: [`CompiledTemplate`] は自己完結しており、
//!   呼び出し側でキャッシュできる

mod mustache;

use std::fmt;

use handlebars::Handlebars;
use marketplace_notifier_domain::NotificationError;
use serde::Serialize;

/// レンダリングコンテキスト
///
/// テンプレートからは `data` という名前で申請データを参照する。
#[derive(Debug, Serialize)]
pub struct RenderContext<'a, T: Serialize> {
    pub data: &'a T,
}

impl<'a, T: Serialize> RenderContext<'a, T> {
    pub fn new(data: &'a T) -> Self {
        Self { data }
    }
}

/// コンパイル済みテンプレート
///
/// テンプレート 1 件だけを登録したレジストリを保持する。`Send + Sync`。
pub struct CompiledTemplate {
    name:     String,
    registry: Handlebars<'static>,
}

impl CompiledTemplate {
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// テンプレートレンダラー
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    pub fn new() -> Self {
        Self
    }

    /// テンプレートテキストをコンパイルする
    ///
    /// 構文エラーの場合は [`NotificationError::TemplateSyntax`] を返す。
    pub fn compile(
        &self,
        text: &str,
        template_name: &str,
    ) -> Result<CompiledTemplate, NotificationError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(false);
        mustache::register_section_helpers(&mut registry);
        registry
            .register_template_string(template_name, mustache::translate_sections(text))
            .map_err(|e| NotificationError::TemplateSyntax {
                template: template_name.to_string(),
                message:  e.to_string(),
            })?;

        Ok(CompiledTemplate {
            name: template_name.to_string(),
            registry,
        })
    }

    /// コンパイル済みテンプレートにコンテキストを適用する
    pub fn execute<T: Serialize>(
        &self,
        compiled: &CompiledTemplate,
        context: &T,
    ) -> Result<String, NotificationError> {
        compiled
            .registry
            .render(&compiled.name, context)
            .map_err(|e| NotificationError::TemplateFailed(format!("{}: {e}", compiled.name)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn ドット区切りのプレースホルダを置換する() {
        let renderer = TemplateRenderer::new();
        let compiled = renderer
            .compile(
                "To {{data.requester.identifier}} about {{data.provider.dataProductFqn}}",
                "test",
            )
            .unwrap();
        let data = json!({
            "requester": { "identifier": "user@example.com" },
            "provider": { "dataProductFqn": "test/product/1.0.0" },
        });

        let output = renderer
            .execute(&compiled, &RenderContext::new(&data))
            .unwrap();

        assert_eq!(output, "To user@example.com about test/product/1.0.0");
    }

    #[test]
    fn 存在しないフィールドは空文字になる() {
        let renderer = TemplateRenderer::new();
        let compiled = renderer
            .compile("[{{data.missing}}][{{data.requester.missing.deeper}}]", "test")
            .unwrap();
        let data = json!({ "requester": null });

        let output = renderer
            .execute(&compiled, &RenderContext::new(&data))
            .unwrap();

        assert_eq!(output, "[][]");
    }

    #[test]
    fn 同じテンプレートとコンテキストからは同じ出力になる() {
        let renderer = TemplateRenderer::new();
        let compiled = renderer.compile("{{data.a}}-{{data.b}}", "test").unwrap();
        let data = json!({ "a": 1, "b": "two" });
        let context = RenderContext::new(&data);

        let first = renderer.execute(&compiled, &context).unwrap();
        let second = renderer.execute(&compiled, &context).unwrap();
        let recompiled = renderer.compile("{{data.a}}-{{data.b}}", "test").unwrap();
        let third = renderer.execute(&recompiled, &context).unwrap();

        assert_eq!(first, "1-two");
        assert_eq!(first, second);
        assert_eq!(first, third);
    }

    #[test]
    fn コンパイル済みテンプレートは別のコンテキストで再利用できる() {
        let renderer = TemplateRenderer::new();
        let compiled = renderer.compile("Hello {{data.name}}", "greeting").unwrap();

        let alice = renderer
            .execute(&compiled, &RenderContext::new(&json!({ "name": "Alice" })))
            .unwrap();
        let bob = renderer
            .execute(&compiled, &RenderContext::new(&json!({ "name": "Bob" })))
            .unwrap();

        assert_eq!(alice, "Hello Alice");
        assert_eq!(bob, "Hello Bob");
        assert_eq!(compiled.name(), "greeting");
    }

    #[test]
    fn 閉じていないブロックは構文エラーになる() {
        let renderer = TemplateRenderer::new();

        let result = renderer.compile("{{#if data.request}}never closed", "broken");

        assert!(matches!(
            result,
            Err(NotificationError::TemplateSyntax { template, .. }) if template == "broken"
        ));
    }

    #[test]
    fn プレースホルダのないテンプレートはそのまま出力される() {
        let renderer = TemplateRenderer::new();
        let compiled = renderer.compile("plain text\n", "plain").unwrap();

        let output = renderer
            .execute(&compiled, &RenderContext::new(&json!({})))
            .unwrap();

        assert_eq!(output, "plain text\n");
    }

    #[test]
    fn コンパイル済みテンプレートはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CompiledTemplate>();
    }

    fn render(template: &str, data: &serde_json::Value) -> String {
        let renderer = TemplateRenderer::new();
        let compiled = renderer.compile(template, "test").unwrap();
        renderer
            .execute(&compiled, &RenderContext::new(data))
            .unwrap()
    }

    #[test]
    fn オブジェクトのセクションはその値をコンテキストにする() {
        let data = json!({
            "request": { "requester": { "identifier": "user@example.com" } },
        });

        let output = render(
            "{{#data.request.requester}}{{identifier}}{{/data.request.requester}}",
            &data,
        );

        assert_eq!(output, "user@example.com");
    }

    #[test]
    fn 配列のセクションは要素ごとに描画する() {
        let data = json!({ "items": [{ "name": "a" }, { "name": "b" }] });

        let output = render("{{#data.items}}[{{name}}]{{/data.items}}", &data);

        assert_eq!(output, "[a][b]");
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "flag": null }))]
    #[case(json!({ "flag": false }))]
    #[case(json!({ "flag": [] }))]
    fn 偽の値のセクションは描画されず反転セクションが描画される(#[case] data: serde_json::Value) {
        let output = render(
            "{{#data.flag}}yes{{/data.flag}}{{^data.flag}}no{{/data.flag}}",
            &data,
        );

        assert_eq!(output, "no");
    }

    #[test]
    fn 真のスカラー値のセクションは現在のコンテキストのまま描画する() {
        let data = json!({ "flag": true, "name": "Alice" });

        let output = render(
            "{{#data.flag}}Hi {{data.name}}{{/data.flag}}{{^data.flag}}no{{/data.flag}}",
            &data,
        );

        assert_eq!(output, "Hi Alice");
    }

    #[test]
    fn 入れ子のセクションを描画できる() {
        let data = json!({
            "request": {
                "provider": { "dataProductFqn": "test/product/1.0.0" },
                "consumer": null,
            },
        });

        let output = render(
            "{{#data.request}}{{#provider}}{{dataProductFqn}}{{/provider}}\
             {{^consumer}} (no consumer){{/consumer}}{{/data.request}}",
            &data,
        );

        assert_eq!(output, "test/product/1.0.0 (no consumer)");
    }

    #[test]
    fn 閉じていないセクションは構文エラーになる() {
        let renderer = TemplateRenderer::new();

        let result = renderer.compile("{{#data.request}}never closed", "broken");

        assert!(matches!(result, Err(NotificationError::TemplateSyntax { .. })));
    }

    #[test]
    fn handlebarsのブロックヘルパーも引き続き使える() {
        let data = json!({ "flag": false });

        let output = render("{{#if data.flag}}on{{else}}off{{/if}}", &data);

        assert_eq!(output, "off");
    }
}
