// ==========================================
// 校园宿舍分配系统 - 房间编码生成引擎
// ==========================================
// 职责: 由宿舍楼名称 + 序号生成唯一、可读的房间编码
// 红线: 纯函数，无副作用；序号推导只允许在分配事务内进行
// ==========================================

/// 编码尾部序号的固定宽度（零填充，保证字典序可排序）
///
/// 宽度同时决定单楼编码空间: 规划的 room_count 不得超过
/// 10^SEQUENCE_LENGTH - 1，由 HouseApi 在规划写入时拦截
pub const SEQUENCE_LENGTH: usize = 4;

/// 生成房间编码
///
/// 规则: 前缀取宿舍楼名称各词首字母（大写），连字符后接零填充序号。
/// 同一宿舍楼 + 同一序号的输出恒定（确定性纯函数）。
///
/// # 示例
/// - ("Blue House", 1)  -> "BH-0001"
/// - ("Aster", 12)      -> "A-0012"
pub fn generate_room_code(house_name: &str, sequence_number: u32) -> String {
    format!(
        "{}-{:0width$}",
        derive_prefix(house_name),
        sequence_number,
        width = SEQUENCE_LENGTH
    )
}

/// 从宿舍楼名称推导编码前缀
///
/// 取各词的首个字母数字字符转大写；名称没有可用词首时
/// 退化为名称前三个字母数字字符；仍为空则用固定前缀 "RM"
fn derive_prefix(house_name: &str) -> String {
    let initials: String = house_name
        .split_whitespace()
        .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if !initials.is_empty() {
        return initials;
    }

    let fallback: String = house_name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .take(3)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if fallback.is_empty() {
        "RM".to_string()
    } else {
        fallback
    }
}

/// 由最近一个房间编码推导下一个序号
///
/// 规则:
/// - 没有历史房间 -> 1
/// - 取编码末尾 SEQUENCE_LENGTH 个字符解析为整数 -> +1
/// - 解析失败（历史遗留/畸形编码）-> 回退到 1，不得 panic
pub fn next_sequence_number(last_code: Option<&str>) -> u32 {
    let code = match last_code {
        Some(code) => code,
        None => return 1,
    };

    let chars: Vec<char> = code.chars().collect();
    if chars.len() < SEQUENCE_LENGTH {
        return 1;
    }

    let tail: String = chars[chars.len() - SEQUENCE_LENGTH..].iter().collect();
    match tail.parse::<u32>() {
        Ok(seq) => seq + 1,
        Err(_) => 1,
    }
}
