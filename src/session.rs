use fantoccini::{Client, ClientBuilder, Locator};
use rand::Rng;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use url::Url;

use crate::config::{Credentials, ScrapeConfig};
use crate::error::{AttemptError, ScrapeError};
use crate::extract;

const LOGIN_URL: &str = "https://www.linkedin.com/login";

/// Realistic desktop fingerprint. Headless defaults and automation switches
/// are the first things the target site checks for.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
const VIEWPORT: (u32, u32) = (1366, 768);

const SIGNIN_MODAL_DISMISS: &str = "button.modal__dismiss, [aria-label='Dismiss']";

/// A live WebDriver browser session.
///
/// Owns the automation context for one run. Must be closed exactly once via
/// [`Session::close`], including on abort paths.
pub struct Session {
    client: Client,
    page_wait: Duration,
}

impl Session {
    /// Connects to the WebDriver endpoint and opens a browser configured to
    /// minimize automated-browser signals.
    pub async fn open(config: &ScrapeConfig) -> Result<Self, ScrapeError> {
        let mut chrome_args = vec![
            "--disable-blink-features=AutomationControlled".to_string(),
            "--no-sandbox".to_string(),
            format!("--window-size={},{}", VIEWPORT.0, VIEWPORT.1),
            format!("--user-agent={}", USER_AGENT),
            "--lang=en-US".to_string(),
        ];
        if config.headless {
            chrome_args.push("--headless=new".to_string());
        }

        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            serde_json::json!({
                "args": chrome_args,
                "excludeSwitches": ["enable-automation"],
            }),
        );

        ::log::info!("Connecting to WebDriver at {}", config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .map_err(|source| ScrapeError::Session {
                url: config.webdriver_url.clone(),
                source,
            })?;

        client.set_window_size(VIEWPORT.0, VIEWPORT.1).await?;

        // Mask the webdriver flag before the site gets a chance to probe it
        client
            .execute(
                "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})",
                vec![],
            )
            .await?;

        Ok(Self {
            client,
            page_wait: config.page_wait(),
        })
    }

    /// Loads one search results page and returns its source.
    ///
    /// Classification: a verification challenge anywhere on the landing page
    /// is `Blocked`; a page that never produced the results container and has
    /// no zero-results banner is `Transient` (timeout); a page with the
    /// banner but no cards is a legitimate empty page and returns Ok.
    pub async fn fetch_results_page(&self, url: &Url) -> Result<String, AttemptError> {
        self.goto(url.as_str()).await?;
        human_delay(800, 1500).await;
        self.dismiss_signin_modal().await;

        let container_found = self
            .client
            .wait()
            .at_most(self.page_wait)
            .for_element(Locator::Css(extract::RESULTS_CONTAINER))
            .await
            .is_ok();

        if container_found {
            // Lazy-loaded cards only render once the list is scrolled
            self.scroll_to_bottom(3).await;
        }

        let html = self.page_source().await?;
        let landed = self.landed_url(url.as_str()).await;

        if extract::is_block_page(&landed, &html) {
            return Err(AttemptError::Blocked);
        }
        if !container_found && !extract::has_no_results_banner(&html) {
            return Err(AttemptError::Transient(ScrapeError::Io(
                std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("results container never appeared for {}", url),
                ),
            )));
        }

        Ok(html)
    }

    /// Loads one listing detail page and returns its source. A page without
    /// the description container is still Ok; the extractor degrades the
    /// missing fields to empty strings.
    pub async fn fetch_detail_page(&self, url: &str) -> Result<String, AttemptError> {
        self.goto(url).await?;
        human_delay(1500, 3000).await;
        self.dismiss_signin_modal().await;

        let _ = self
            .client
            .wait()
            .at_most(self.page_wait)
            .for_element(Locator::Css(extract::detail::DESCRIPTION_SELECTOR))
            .await;

        let html = self.page_source().await?;
        let landed = self.landed_url(url).await;

        if extract::is_block_page(&landed, &html) {
            return Err(AttemptError::Blocked);
        }
        Ok(html)
    }

    /// Attempts to authenticate. Returns false (guest mode) on any failure;
    /// a failed login never aborts the run.
    pub async fn login(&self, creds: &Credentials) -> bool {
        ::log::info!("Logging in as {}", creds.email);

        let result = async {
            self.client.goto(LOGIN_URL).await?;
            human_delay(1000, 2000).await;

            self.type_slowly(Locator::Id("username"), &creds.email).await?;
            human_delay(300, 800).await;
            self.type_slowly(Locator::Id("password"), &creds.password).await?;
            human_delay(300, 800).await;

            self.client
                .find(Locator::Css("button[type='submit']"))
                .await?
                .click()
                .await?;

            Ok::<(), fantoccini::error::CmdError>(())
        }
        .await;

        if let Err(e) = result {
            ::log::warn!("Login flow failed, continuing as guest: {}", e);
            return false;
        }

        // The feed URL is the success signal; CAPTCHA or 2FA never reaches it
        let deadline = Instant::now() + Duration::from_secs(15);
        while Instant::now() < deadline {
            if let Ok(current) = self.client.current_url().await {
                if current.path().starts_with("/feed") {
                    ::log::info!("Logged in successfully");
                    return true;
                }
            }
            sleep(Duration::from_millis(500)).await;
        }

        ::log::warn!("Login did not reach the feed (CAPTCHA or bad credentials), continuing as guest");
        false
    }

    /// Releases the browser session.
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }
    }

    async fn goto(&self, url: &str) -> Result<(), AttemptError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| AttemptError::Transient(ScrapeError::Navigation(e)))
    }

    async fn page_source(&self) -> Result<String, AttemptError> {
        self.client
            .source()
            .await
            .map_err(|e| AttemptError::Transient(ScrapeError::Navigation(e)))
    }

    /// URL the navigation actually landed on; challenges often redirect.
    async fn landed_url(&self, requested: &str) -> String {
        match self.client.current_url().await {
            Ok(url) => url.to_string(),
            Err(_) => requested.to_string(),
        }
    }

    /// Close the "Sign in to see more" modal if it appeared.
    async fn dismiss_signin_modal(&self) {
        if let Ok(button) = self.client.find(Locator::Css(SIGNIN_MODAL_DISMISS)).await {
            if button.click().await.is_ok() {
                ::log::debug!("Dismissed sign-in modal");
                human_delay(500, 1000).await;
            }
        }
    }

    async fn scroll_to_bottom(&self, times: usize) {
        for _ in 0..times {
            let _ = self
                .client
                .execute("window.scrollTo(0, document.body.scrollHeight)", vec![])
                .await;
            human_delay(800, 1500).await;
        }
    }

    /// Types into a field one character at a time with per-key jitter.
    async fn type_slowly(
        &self,
        locator: Locator<'_>,
        text: &str,
    ) -> Result<(), fantoccini::error::CmdError> {
        let field = self.client.find(locator).await?;
        field.click().await?;
        for ch in text.chars() {
            field.send_keys(&ch.to_string()).await?;
            human_delay(50, 150).await;
        }
        Ok(())
    }
}

/// Sleep a randomized interval, like a person pausing between actions.
async fn human_delay(min_ms: u64, max_ms: u64) {
    let ms = {
        let mut rng = rand::thread_rng();
        rng.gen_range(min_ms..max_ms)
    };
    sleep(Duration::from_millis(ms)).await;
}
