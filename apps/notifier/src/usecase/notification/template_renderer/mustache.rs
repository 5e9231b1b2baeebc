//! # mustache セクションの互換層
//!
//! handlebars はブロックの開始タグにヘルパー名を要求するため、mustache の
//! `{{#a.b}}...{{/a.b}}` と `{{^a.b}}...{{/a.b}}` はそのままではコンパイルできない。
//! コンパイル前にセクションを [`SECTION_HELPER`] / [`INVERTED_HELPER`] の呼び出しへ
//! 書き換え、mustache と同じ規則で描画するヘルパーをレジストリに登録する。
//!
//! | 値 | `{{#name}}` | `{{^name}}` |
//! |----|-------------|-------------|
//! | 欠落、`null`、`false`、空配列 | 描画しない | 1 回描画 |
//! | 空でない配列 | 要素ごとに、要素をコンテキストにして描画 | 描画しない |
//! | オブジェクト | オブジェクトをコンテキストにして 1 回描画 | 描画しない |
//! | その他の値 | 現在のコンテキストのまま 1 回描画 | 描画しない |
//!
//! セクション内の名前はセクションの値を基準に解決する。外側の値は `../` で参照する。
//! `{{#if x}}` のように空白を含む開始タグは handlebars のヘルパー呼び出しとして残す。

use handlebars::{
    BlockContext,
    Context,
    Handlebars,
    Helper,
    HelperDef,
    HelperResult,
    JsonValue,
    Output,
    PathAndJson,
    RenderContext,
    RenderErrorReason,
    Renderable,
    Template,
};

pub(super) const SECTION_HELPER: &str = "mustache_section";
pub(super) const INVERTED_HELPER: &str = "mustache_inverted";

/// 開いているブロック
///
/// `helper` が `Some` のものは書き換えたセクション、`None` は handlebars のブロック。
struct OpenBlock<'a> {
    name:   &'a str,
    helper: Option<&'static str>,
}

/// mustache のセクションタグを handlebars のブロックヘルパー呼び出しに書き換える
///
/// セクション以外のタグと地の文はそのまま残す。
pub(super) fn translate_sections(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut open_blocks: Vec<OpenBlock<'_>> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("{{") {
        output.push_str(&rest[..start]);
        let tag = &rest[start..];
        let Some(end) = tag.find("}}") else {
            rest = tag;
            break;
        };
        match rewrite_tag(&tag[2..end], &mut open_blocks) {
            Some(rewritten) => output.push_str(&rewritten),
            None => output.push_str(&tag[..end + 2]),
        }
        rest = &tag[end + 2..];
    }

    output.push_str(rest);
    output
}

fn rewrite_tag<'a>(inner: &'a str, open_blocks: &mut Vec<OpenBlock<'a>>) -> Option<String> {
    let mut chars = inner.chars();
    let sigil = chars.next()?;
    let body = chars.as_str().trim();

    match sigil {
        '#' | '^' if is_section_name(body) => {
            let helper = if sigil == '#' {
                SECTION_HELPER
            } else {
                INVERTED_HELPER
            };
            open_blocks.push(OpenBlock {
                name:   body,
                helper: Some(helper),
            });
            Some(format!("{{{{#{helper} {body}}}}}"))
        }
        '#' | '^' => {
            if let Some(name) = body.split_whitespace().next() {
                open_blocks.push(OpenBlock { name, helper: None });
            }
            None
        }
        '/' => {
            let top = open_blocks.last()?;
            if top.name != body {
                return None;
            }
            let helper = top.helper;
            open_blocks.pop();
            helper.map(|helper| format!("{{{{/{helper}}}}}"))
        }
        _ => None,
    }
}

fn is_section_name(body: &str) -> bool {
    !body.is_empty()
        && body != "else"
        && body
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '$'))
}

/// レジストリにセクション描画用のヘルパーを登録する
pub(super) fn register_section_helpers(registry: &mut Handlebars<'_>) {
    registry.register_helper(SECTION_HELPER, Box::new(SectionHelper { inverted: false }));
    registry.register_helper(INVERTED_HELPER, Box::new(SectionHelper { inverted: true }));
}

#[derive(Clone, Copy)]
struct SectionHelper {
    inverted: bool,
}

impl HelperDef for SectionHelper {
    fn call<'reg: 'rc, 'rc>(
        &self,
        h: &Helper<'rc>,
        r: &'reg Handlebars<'reg>,
        ctx: &'rc Context,
        rc: &mut RenderContext<'reg, 'rc>,
        out: &mut dyn Output,
    ) -> HelperResult {
        let helper_name = if self.inverted {
            INVERTED_HELPER
        } else {
            SECTION_HELPER
        };
        let param = h
            .param(0)
            .ok_or(RenderErrorReason::ParamNotFoundForIndex(helper_name, 0))?;
        let Some(template) = h.template() else {
            return Ok(());
        };

        if self.inverted {
            return if is_truthy(param.value()) {
                Ok(())
            } else {
                template.render(r, ctx, rc, out)
            };
        }

        match param.value() {
            value if !is_truthy(value) => Ok(()),
            JsonValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let block = section_block(param, Some(index), item);
                    render_in_block(block, template, r, ctx, rc, out)?;
                }
                Ok(())
            }
            value @ JsonValue::Object(_) => {
                let block = section_block(param, None, value);
                render_in_block(block, template, r, ctx, rc, out)
            }
            _ => template.render(r, ctx, rc, out),
        }
    }
}

/// mustache の真偽判定（`null`、`false`、空配列のみ偽）
fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null | JsonValue::Bool(false) => false,
        JsonValue::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn section_block<'rc>(
    param: &PathAndJson<'rc>,
    index: Option<usize>,
    value: &JsonValue,
) -> BlockContext<'rc> {
    let mut block = BlockContext::new();
    match param.context_path() {
        Some(path) => {
            let mut path = path.clone();
            if let Some(index) = index {
                path.push(index.to_string());
            }
            *block.base_path_mut() = path;
        }
        None => block.set_base_value(value.clone()),
    }
    block
}

fn render_in_block<'reg: 'rc, 'rc>(
    block: BlockContext<'rc>,
    template: &'rc Template,
    r: &'reg Handlebars<'reg>,
    ctx: &'rc Context,
    rc: &mut RenderContext<'reg, 'rc>,
    out: &mut dyn Output,
) -> HelperResult {
    rc.push_block(block);
    let result = template.render(r, ctx, rc, out);
    rc.pop_block();
    result
}
