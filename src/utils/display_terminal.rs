//! 터미널 출력 포맷팅 유틸리티
//!
//! 서비스 레지스트리 초기화와 서버 기동 과정을 터미널에 보기 좋게 출력합니다.
//! 문자열 생성(`format_*`)과 출력(`print_*`)을 분리해 두어 포맷을 테스트할 수 있습니다.
//!
//! ```text
//! ╔══════════════════════════════════════════════════╗
//! ║         🔄 INITIALIZING SERVICE REGISTRY         ║
//! ╚══════════════════════════════════════════════════╝
//! → Step 1: Creating Repository instances
//!    ├─ game_repository: ✓ Created
//! ✓ Step 1: Repository instances created (5 items)
//! ```

const BOX_WIDTH: usize = 50;

/// 박스 제목 문자열을 생성합니다. 제목은 가운데 정렬됩니다.
pub fn format_boxed_title(title: &str) -> String {
    let border = "═".repeat(BOX_WIDTH);
    format!("╔{border}╗\n║{:^width$}║\n╚{border}╝", title, width = BOX_WIDTH - 1)
}

pub fn print_boxed_title(title: &str) {
    println!("{}", format_boxed_title(title));
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 하위 작업 한 줄 (`   ├─ name: status`)
pub fn format_sub_task(name: &str, status: &str) -> String {
    format!("   ├─ {}: {}", name, status)
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("{}", format_sub_task(name, status));
}

/// 레지스트리 초기화 요약을 출력합니다.
pub fn print_final_summary(repos: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repos);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repos + services);
    println!();
}

/// 이름 → 등록정보 캐시가 채워졌음을 출력합니다.
pub fn print_cache_initialized(cache_type: &str, count: usize) {
    println!("{}", format_sub_task(&format!("{} Cache", cache_type), &format!("{} entries loaded", count)));
}

/// 서버 기동 시 주요 엔드포인트 목록을 출력합니다.
pub fn print_endpoint_table(bind_address: &str, scopes: &[(&str, &str)]) {
    print_boxed_title("🎮 GAME LENDING SERVICE");
    for (path, description) in scopes {
        println!("{}", format_sub_task(&format!("http://{}{}", bind_address, path), description));
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boxed_title_lines_have_equal_width() {
        let boxed = format_boxed_title("REGISTRY");
        let widths: Vec<usize> = boxed.lines().map(|line| line.chars().count()).collect();

        assert_eq!(widths.len(), 3);
        assert_eq!(widths[0], BOX_WIDTH + 2);
        assert_eq!(widths[1], BOX_WIDTH + 1);
        assert!(boxed.contains("REGISTRY"));
    }

    #[test]
    fn test_sub_task_format() {
        assert_eq!(format_sub_task("loan_repository", "✓ Created"), "   ├─ loan_repository: ✓ Created");
    }
}
