use applicants_parser::browser::connect_to_browser;
use applicants_parser::config::Config;
use applicants_parser::infrastructure::{ChromeNavigator, JsExecutor, MemoryPublisher};
use applicants_parser::orchestrator::Orchestrator;
use applicants_parser::services::{urls, UniversityStage};
use applicants_parser::utils::logging;
use tokio_test::assert_ok;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_single_university() {
    logging::init(true);
    let config = Config::from_env();

    let (_browser, page) = connect_to_browser(config.browser_debug_port)
        .await
        .expect("连接浏览器失败");
    let navigator = ChromeNavigator::new(JsExecutor::new(page));
    let orchestrator = Orchestrator::new(&config, navigator, MemoryPublisher::new());

    let url = urls::generate_university_urls(&config.site_root, config.university_id_start..=config.university_id_start)
        .next()
        .expect("至少一个大学 URL");

    let summary = orchestrator
        .run(&url, &config.education_forms, &config.education_levels)
        .await
        .expect("处理大学失败");

    println!(
        "方向 {}, 申请人 {}, 跳过/失败 {}",
        summary.directions,
        summary.applicants,
        summary.failures.len()
    );
    assert_eq!(summary.universities, 1);
}

#[tokio::test]
#[ignore]
async fn test_browser_connection() {
    logging::init(true);
    let config = Config::from_env();

    let result = connect_to_browser(config.browser_debug_port).await;

    assert_ok!(result, "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_university_page() {
    logging::init(true);
    let config = Config::from_env();

    let (_browser, page) = connect_to_browser(config.browser_debug_port)
        .await
        .expect("连接浏览器失败");
    let navigator = ChromeNavigator::new(JsExecutor::new(page));
    let url = format!("{}/vuznavigator/universities/{}", config.site_root, config.university_id_start);

    let university = UniversityStage::new(config.selector_timeout() * 10)
        .resolve(&navigator, &url)
        .await
        .expect("解析大学页面失败");

    println!("{:?}", university);
    assert!(!university.title.is_empty());
}
