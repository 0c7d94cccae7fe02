//! Built-in translation tables.
//!
//! One entry per key referenced by the UI, with the Chinese and English text
//! side by side. These are the tables written to `lang/<code>.json` on first
//! run; translators edit the JSON files, not this source.

use std::collections::BTreeMap;

use super::Language;

/// `(key, zh, en)` triples. Templates may contain positional `{}`
/// placeholders filled by `TranslationStore::get_with`.
const MESSAGES: &[(&str, &str, &str)] = &[
    ("title", "Reclist Generator", "Reclist Generator"),
    ("path_settings", "路径设置", "Path Settings"),
    ("input_file_path", "输入文件路径：", "Input File Path:"),
    ("browse", "浏览", "Browse"),
    ("reclist_output_path", "Reclist输出路径：", "Reclist Output Path:"),
    ("oto_output_path", "OTO输出路径：", "OTO Output Path:"),
    ("reclist_settings", "录音表设置", "Reclist Settings"),
    ("length_per_line", "每行长度：", "Length per line:"),
    ("include_cv_head", "生成所有起始音", "Include all CV heads"),
    ("include_vv", "生成所有VV连接", "Include all VV connections"),
    ("use_underbar", "使用下划线", "Use underbar"),
    ("planb", "PlanB", "PlanB"),
    ("oto_settings", "OTO设置", "OTO Settings"),
    ("max_same_cv", "相同CV最大数量：", "Max same CV:"),
    ("max_same_vc", "相同VC最大数量：", "Max same VC:"),
    ("preset_blank", "预设空白：", "Preset blank:"),
    ("bpm", "BPM：", "BPM:"),
    ("divide_vccv", "分割VCCV", "Divide VCCV"),
    ("start_generation", "开始生成", "Start Generation"),
    ("exit", "退出", "Exit"),
    ("generation_success", "生成成功", "Generation Success"),
    ("generation_failed", "生成失败", "Generation Failed"),
    (
        "success_message",
        "Reclist和OTO文件已成功生成！",
        "Reclist and OTO files have been successfully generated!",
    ),
    ("error_message", "生成过程中出现错误：{}", "Error during generation: {}"),
    ("unknown_error", "发生未知错误：{}", "Unknown error occurred: {}"),
    ("menu_language", "语言", "Language"),
    ("menu_help", "帮助", "Help"),
    ("menu_readme", "查看README", "View README"),
    ("menu_github", "开源地址", "GitHub"),
];

/// Build the complete built-in table for `lang`.
pub(crate) fn table(lang: Language) -> BTreeMap<String, String> {
    MESSAGES
        .iter()
        .map(|(key, zh, en)| {
            let text = match lang {
                Language::Zh => zh,
                Language::En => en,
            };
            ((*key).to_string(), (*text).to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_complete_for_every_language() {
        for lang in Language::ALL {
            let table = table(lang);
            assert_eq!(table.len(), MESSAGES.len());
            for (key, _, _) in MESSAGES {
                assert!(table.contains_key(*key), "{key} missing for {lang:?}");
            }
        }
    }

    #[test]
    fn format_templates_carry_one_placeholder() {
        for lang in Language::ALL {
            let table = table(lang);
            assert_eq!(table["error_message"].matches("{}").count(), 1);
            assert_eq!(table["unknown_error"].matches("{}").count(), 1);
        }
    }
}
