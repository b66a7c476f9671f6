// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 从模型回复中截取内嵌的 JSON 对象
///
/// 取第一个 `{` 到最后一个 `}`（含）之间的内容；找不到成对的括号时原样返回。
/// 字符串值里出现的花括号不做特殊处理。
pub fn repair(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}
