use std::{path::PathBuf, time::Duration};

use color_eyre::Result;
use log::{debug, error, warn};
use tokio::time::sleep;

use crate::{
    FetcherBox, GenModBox,
    fetch::Fetcher as _,
    generation::GenerationModel as _,
    run_log::{FAILURE_MARKER, LogEntry, RunLog},
};

#[derive(Debug)]
pub struct PromptOutcome {
    pub prompt: String,
    /// `None` means the generation call failed for this prompt.
    pub locators: Option<Vec<String>>,
    pub local_paths: Vec<String>,
}

pub struct BatchDriver {
    model: GenModBox,
    fetcher: FetcherBox,
    run_log: RunLog,
    images_dir: PathBuf,
    delay: Duration,
}

impl BatchDriver {
    pub fn new(
        model: GenModBox,
        fetcher: FetcherBox,
        run_log: RunLog,
        images_dir: PathBuf,
        delay: Duration,
    ) -> Self {
        Self {
            model,
            fetcher,
            run_log,
            images_dir,
            delay,
        }
    }

    /// Runs every prompt in order. A prompt that fails never stops the
    /// batch; the only error that aborts the run is a log-append failure.
    /// The pause runs after every prompt, failed or not.
    pub async fn run(&self, prompts: &[&str]) -> Result<Vec<PromptOutcome>> {
        debug!(
            "Starting batch of {} prompt(s) on {}",
            prompts.len(),
            self.model.model()
        );
        let mut outcomes = Vec::with_capacity(prompts.len());

        for &prompt in prompts {
            println!("Generating design for prompt: {prompt}");
            let outcome = self.run_prompt(prompt).await;

            self.run_log.append(&LogEntry {
                prompt: &outcome.prompt,
                locators: outcome.locators.as_deref(),
                local_paths: &outcome.local_paths,
            })?;

            report(&outcome);
            outcomes.push(outcome);

            sleep(self.delay).await;
        }

        Ok(outcomes)
    }

    async fn run_prompt(&self, prompt: &str) -> PromptOutcome {
        let locators = match self.model.generate(prompt).await {
            Ok(locators) => locators,
            Err(e) => {
                eprintln!("Error generating design: {e:#}");
                error!("Generation failed for {prompt:?}: {e:?}");
                return PromptOutcome {
                    prompt: prompt.to_string(),
                    locators: None,
                    local_paths: vec![],
                };
            }
        };
        debug!("Received {} locator(s) for {prompt:?}", locators.len());

        let mut local_paths = Vec::with_capacity(locators.len());
        for url in &locators {
            match self.fetcher.fetch(url, &self.images_dir).await {
                Ok(path) => local_paths.push(path),
                Err(e) => {
                    eprintln!("Error downloading image: {e:#}");
                    warn!("Download of {url} failed: {e:?}");
                }
            }
        }

        PromptOutcome {
            prompt: prompt.to_string(),
            locators: Some(locators),
            local_paths,
        }
    }
}

fn report(outcome: &PromptOutcome) {
    match &outcome.locators {
        Some(locators) => println!("Generated URLs:\n{locators:?}"),
        None => println!("Generated URLs:\n{FAILURE_MARKER}"),
    }
    println!("Local paths:\n{:?}\n", outcome.local_paths);
}

#[cfg(test)]
mod test {
    use std::{
        collections::VecDeque,
        future::Future,
        path::Path,
        pin::Pin,
        sync::{Arc, Mutex},
    };

    use color_eyre::eyre::eyre;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        fetch::Fetcher,
        generation::{GenerationModel, Model},
    };

    /// Pops one canned response per call; `None` scripts a failure.
    #[derive(Clone)]
    struct ScriptedModel {
        responses: Arc<Mutex<VecDeque<Option<Vec<String>>>>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Option<Vec<String>>>) -> Self {
            Self {
                responses: Arc::new(Mutex::new(responses.into())),
            }
        }
    }

    impl GenerationModel for ScriptedModel {
        fn generate<'a>(
            &'a self,
            _prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<String>>> + Send + 'a>> {
            let next = self.responses.lock().unwrap().pop_front();
            Box::pin(async move {
                match next.flatten() {
                    Some(locators) => Ok(locators),
                    None => Err(eyre!("scripted generation failure")),
                }
            })
        }

        fn clone(&self) -> Box<dyn GenerationModel + Send + 'static> {
            Box::new(Clone::clone(self))
        }

        fn model(&self) -> Model {
            Model::IdeogramQuality
        }
    }

    /// Records every requested URL and fails the ones it is told to.
    #[derive(Clone)]
    struct ScriptedFetcher {
        calls: Arc<Mutex<Vec<String>>>,
        fail_on: Vec<String>,
    }

    impl ScriptedFetcher {
        fn new(fail_on: Vec<String>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(vec![]));
            let fetcher = Self {
                calls: Arc::clone(&calls),
                fail_on,
            };
            (fetcher, calls)
        }
    }

    impl Fetcher for ScriptedFetcher {
        fn fetch<'a>(
            &'a self,
            url: &'a str,
            _images_dir: &'a Path,
        ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
            self.calls.lock().unwrap().push(url.to_string());
            let fail = self.fail_on.iter().any(|u| u == url);
            Box::pin(async move {
                if fail {
                    Err(eyre!("scripted download failure"))
                } else {
                    Ok(format!("/images/generated/{}", url.rsplit('/').next().unwrap()))
                }
            })
        }

        fn clone(&self) -> Box<dyn Fetcher + Send + 'static> {
            Box::new(Clone::clone(self))
        }
    }

    fn make_driver(
        model: ScriptedModel,
        fetcher: ScriptedFetcher,
        tmp: &TempDir,
    ) -> BatchDriver {
        BatchDriver::new(
            Box::new(model),
            Box::new(fetcher),
            RunLog::new(tmp.path().join("log.txt")),
            tmp.path().join("images"),
            Duration::ZERO,
        )
    }

    fn read_log(tmp: &TempDir) -> String {
        std::fs::read_to_string(tmp.path().join("log.txt")).unwrap()
    }

    #[tokio::test]
    async fn failed_generation_skips_the_fetch_step() -> Result<()> {
        let tmp = TempDir::new()?;
        let (fetcher, calls) = ScriptedFetcher::new(vec![]);
        let driver = make_driver(ScriptedModel::new(vec![None]), fetcher, &tmp);

        let outcomes = driver.run(&["some prompt"]).await?;

        assert!(calls.lock().unwrap().is_empty());
        assert!(outcomes[0].locators.is_none());
        assert!(outcomes[0].local_paths.is_empty());

        let log = read_log(&tmp);
        assert!(log.contains("URLs: <generation failed>"));
        assert!(log.contains("Local paths: []"));
        Ok(())
    }

    #[tokio::test]
    async fn every_locator_is_fetched_once() -> Result<()> {
        let tmp = TempDir::new()?;
        let urls = vec![
            "http://host/a.png".to_string(),
            "http://host/b.png".to_string(),
        ];
        let (fetcher, calls) = ScriptedFetcher::new(vec![]);
        let driver = make_driver(
            ScriptedModel::new(vec![Some(urls.clone())]),
            fetcher,
            &tmp,
        );

        let outcomes = driver.run(&["some prompt"]).await?;

        assert_eq!(*calls.lock().unwrap(), urls);
        assert_eq!(
            outcomes[0].local_paths,
            vec!["/images/generated/a.png", "/images/generated/b.png"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn one_failed_download_leaves_the_others_alone() -> Result<()> {
        let tmp = TempDir::new()?;
        let urls = vec![
            "http://host/a.png".to_string(),
            "http://host/b.png".to_string(),
        ];
        let (fetcher, calls) = ScriptedFetcher::new(vec!["http://host/a.png".to_string()]);
        let driver = make_driver(
            ScriptedModel::new(vec![Some(urls.clone())]),
            fetcher,
            &tmp,
        );

        let outcomes = driver.run(&["some prompt"]).await?;

        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(outcomes[0].local_paths, vec!["/images/generated/b.png"]);
        Ok(())
    }

    #[tokio::test]
    async fn a_failed_prompt_never_stops_the_batch() -> Result<()> {
        let tmp = TempDir::new()?;
        let (fetcher, _calls) = ScriptedFetcher::new(vec![]);
        let driver = make_driver(
            ScriptedModel::new(vec![None, Some(vec!["http://host/c.png".to_string()])]),
            fetcher,
            &tmp,
        );

        let outcomes = driver.run(&["first", "second"]).await?;

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].locators.is_none());
        assert_eq!(outcomes[1].local_paths, vec!["/images/generated/c.png"]);

        let log = read_log(&tmp);
        assert!(log.contains("Prompt: first"));
        assert!(log.contains("Prompt: second"));
        Ok(())
    }
}
