//! Tests for the classifier invoker. The fake classifier is a shell script,
//! so everything that spawns it is Unix-only.

use super::*;

use rstest::rstest;

#[rstest]
#[case(Phase::Train, "-train", "training")]
#[case(Phase::Test, "-test", "testing")]
fn phase_flags_and_names(#[case] phase: Phase, #[case] flag: &str, #[case] name: &str) {
    assert_eq!(phase.flag(), flag);
    assert_eq!(phase.to_string(), name);
}

#[test]
fn process_errors_describe_themselves() {
    let launch = ProcessError::Io(io::Error::new(io::ErrorKind::NotFound, "no such file"));
    assert_eq!(launch.to_string(), "failed to run child process: no such file");
    assert!(std::error::Error::source(&launch).is_some());

    let timed_out = ProcessError::TimedOut;
    assert_eq!(
        timed_out.to_string(),
        "child process exceeded its timeout and was killed"
    );
    assert!(std::error::Error::source(&timed_out).is_none());
}

#[test]
fn defaults_abort_without_timeout() {
    let classifier = ExternalClassifier::new(DEFAULT_CLASSIFIER);
    assert_eq!(classifier.timeout(), None);
    assert_eq!(classifier.train_policy(), TrainFailurePolicy::Abort);
}

#[cfg(unix)]
mod process {
    use super::*;

    use sensedist_test_support::classifier::{FakeClassifier, InstalledClassifier};
    use sensedist_test_support::tracing::RecordingLayer;
    use tempfile::TempDir;
    use tracing::Level;
    use tracing_subscriber::layer::SubscriberExt;

    struct Setup {
        dir: TempDir,
        fake: InstalledClassifier,
    }

    impl Setup {
        fn new(fake: &FakeClassifier) -> Self {
            let dir = match TempDir::new() {
                Ok(dir) => dir,
                Err(err) => panic!("failed to create temp dir: {err}"),
            };
            let fake = match fake.install(dir.path()) {
                Ok(fake) => fake,
                Err(err) => panic!("failed to install fake classifier: {err}"),
            };
            Self { dir, fake }
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }

        fn classifier(&self) -> ExternalClassifier {
            ExternalClassifier::new(self.fake.program())
        }
    }

    fn shell(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn run_process_captures_both_streams() {
        let output = match run_process(shell("echo out; echo err >&2; exit 3"), None) {
            Ok(output) => output,
            Err(err) => panic!("process must run: {err:?}"),
        };
        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout, b"out\n");
        assert_eq!(output.stderr, b"err\n");
        assert_eq!(output.detail(), "err");
    }

    #[test]
    fn run_process_drains_output_larger_than_a_pipe_buffer() {
        let script =
            "i=0; while [ $i -lt 20000 ]; do echo 'line of padding text'; i=$((i+1)); done";
        let output = match run_process(shell(script), Some(Duration::from_secs(30))) {
            Ok(output) => output,
            Err(err) => panic!("process must run: {err:?}"),
        };
        assert!(output.status.success());
        assert_eq!(output.stdout.len(), 20_000 * "line of padding text\n".len());
    }

    #[test]
    fn run_process_times_out() {
        let result = run_process(shell("sleep 5"), Some(Duration::from_millis(100)));
        assert!(matches!(result, Err(ProcessError::TimedOut)));
    }

    #[test]
    fn detail_falls_back_to_stdout_then_placeholder() {
        let output = match run_process(shell("echo only stdout"), None) {
            Ok(output) => output,
            Err(err) => panic!("process must run: {err:?}"),
        };
        assert_eq!(output.detail(), "only stdout");

        let silent = match run_process(shell("true"), None) {
            Ok(output) => output,
            Err(err) => panic!("process must run: {err:?}"),
        };
        assert_eq!(silent.detail(), "no diagnostic output");
    }

    #[test]
    fn train_passes_arguments_in_classifier_order() {
        let setup = Setup::new(&FakeClassifier::new());
        let (corpus, seed, model) = (
            setup.path("bank"),
            setup.path("bank.seed"),
            setup.path("bank.classifier"),
        );
        if let Err(err) = setup.classifier().train("bank", &corpus, &seed, &model) {
            panic!("training must succeed: {err}");
        }

        let expected: Vec<String> = vec![
            "-train".into(),
            corpus.display().to_string(),
            seed.display().to_string(),
            model.display().to_string(),
            "bank".into(),
        ];
        assert_eq!(setup.fake.train_args(), Some(expected));
        assert!(model.exists(), "the fake writes the model file");
    }

    #[test]
    fn test_passes_arguments_and_returns_stdout() {
        let setup = Setup::new(&FakeClassifier::new().with_test_output("-1 1.0000\n2 0.5000\n"));
        let (corpus, model) = (setup.path("bank"), setup.path("bank.classifier"));
        let stdout = match setup.classifier().test("bank", &model, &corpus) {
            Ok(stdout) => stdout,
            Err(err) => panic!("test phase must succeed: {err}"),
        };
        assert_eq!(stdout, b"-1 1.0000\n2 0.5000\n");

        let expected: Vec<String> = vec![
            "-test".into(),
            model.display().to_string(),
            corpus.display().to_string(),
            "bank".into(),
        ];
        assert_eq!(setup.fake.test_args(), Some(expected));
    }

    #[test]
    fn failing_training_aborts_by_default() {
        let setup = Setup::new(&FakeClassifier::new().with_train_exit(4));
        let err = setup
            .classifier()
            .train(
                "bank",
                &setup.path("bank"),
                &setup.path("bank.seed"),
                &setup.path("bank.classifier"),
            )
            .expect_err("training failure must be fatal");
        match err {
            SenseDistError::ClassifierFailed { phase, status, .. } => {
                assert_eq!(phase, Phase::Train);
                assert_eq!(status.code(), Some(4));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn lenient_training_warns_with_the_exit_code() {
        let setup = Setup::new(
            &FakeClassifier::new()
                .with_train_exit(4)
                .with_train_stdout("seed file is empty"),
        );
        let classifier = setup.classifier().with_train_policy(TrainFailurePolicy::Warn);
        let layer = RecordingLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());

        let result = tracing::subscriber::with_default(subscriber, || {
            classifier.train(
                "bank",
                &setup.path("bank"),
                &setup.path("bank.seed"),
                &setup.path("bank.classifier"),
            )
        });

        assert!(result.is_ok(), "lenient training must continue: {result:?}");
        let event = match layer.event(
            Level::WARN,
            "classifier training failed; continuing with the existing model",
        ) {
            Some(event) => event,
            None => panic!("warning must be emitted; events: {:?}", layer.events()),
        };
        assert_eq!(event.field("exit_code"), Some("4"));
        assert_eq!(event.field("detail"), Some("seed file is empty"));

        let span = match layer.span("classifier.train") {
            Some(span) => span,
            None => panic!("classifier.train span must close"),
        };
        assert_eq!(span.field("exit_code"), Some("4"));
    }

    #[test]
    fn failing_test_phase_carries_stderr() {
        let setup = Setup::new(
            &FakeClassifier::new()
                .with_test_exit(2)
                .with_test_stderr("cannot open model\n"),
        );
        let err = setup
            .classifier()
            .test("bank", &setup.path("bank.classifier"), &setup.path("bank"))
            .expect_err("test failure must be fatal");
        match err {
            SenseDistError::ClassifierFailed { phase, detail, .. } => {
                assert_eq!(phase, Phase::Test);
                assert_eq!(detail, "cannot open model");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn slow_test_phase_times_out() {
        let setup = Setup::new(&FakeClassifier::new().with_test_delay_secs(5));
        let limit = Duration::from_millis(200);
        let err = setup
            .classifier()
            .with_timeout(Some(limit))
            .test("bank", &setup.path("bank.classifier"), &setup.path("bank"))
            .expect_err("slow classifier must time out");
        match err {
            SenseDistError::ClassifierTimeout { phase, timeout } => {
                assert_eq!(phase, Phase::Test);
                assert_eq!(timeout, limit);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_program_is_a_launch_failure() {
        let setup = Setup::new(&FakeClassifier::new());
        let missing = setup.path("no-such-classifier");
        let err = ExternalClassifier::new(&missing)
            .test("bank", &setup.path("bank.classifier"), &setup.path("bank"))
            .expect_err("missing executable must fail");
        match err {
            SenseDistError::ClassifierLaunch { phase, program, .. } => {
                assert_eq!(phase, Phase::Test);
                assert_eq!(program, missing);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
