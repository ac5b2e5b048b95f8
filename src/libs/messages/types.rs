#[derive(Debug, Clone)]
pub enum Message {
    // === MONITOR / WATCHER MESSAGES ===
    WatcherRunning {
        source: String,
        threshold: String,
        poll_interval: u64,
    },
    WatcherShuttingDown,
    WatcherStopped(usize), // alerts raised
    StatusLine(String),    // status
    StatusDetails {
        status: String,
        threshold: String,
        looking_away_for: Option<u64>,
        alerts: usize,
    },
    ThresholdChanged(String),
    ThresholdInvalid(String), // reason
    PollStillInFlight,
    PollTaskFailed(String),

    // === ALERT MESSAGES ===
    AlertRaised {
        at: String,
        seconds: u64,
    },
    AlertDismissed,
    NoAlertToAcknowledge,
    AlertNotificationTitle,
    AlertNotificationBody(u64), // seconds
    AlertSoundFailed(String),
    SystemSoundFailed(String),
    DesktopNotificationFailed(String),
    SoundsHeader,
    SoundEntry {
        name: String,
        description: String,
        selected: bool,
    },
    SoundPlayed(String),

    // === CONSOLE MESSAGES ===
    ConsoleHint,
    ConsoleHelp,
    ConsoleReadFailed(String),
    UnknownConsoleCommand(String),

    // === DETECTION SOURCE MESSAGES ===
    StatusPollFailed(String),
    StatusEndpointReport {
        url: String,
        alert: bool,
    },
    StatusEndpointFailed {
        url: String,
        error: String,
    },
    KeyboardListenerFailed(String),
    SimulationKeyHint(String),
    SimulationKeyDown(String),
    SimulationKeyUp(String),

    // === CAMERA MESSAGES ===
    CameraGranted(String),     // device path
    CameraUnavailable(String), // reason

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigDeleted,
    ConfigFileNotFound,
    ConfigReadFailed(String),
    ConfigModuleMonitor,
    ConfigModuleAlert,
    ConfigModuleCamera,
    PromptSelectModules,
    PromptThreshold,
    PromptPollInterval,
    PromptSource,
    PromptStatusUrl,
    PromptSimulationKey,
    PromptSound,
    PromptAcknowledge,
    PromptDisplayDuration,
    PromptDesktopNotification,
    PromptCameraCheck,
    PromptCameraDevice,

    // === BACKGROUND WATCHER MESSAGES ===
    BackgroundWatcherStarted(u32),
    BackgroundWatcherStopped(u32),
    StoppingExistingWatcher(String),
    FailedToStopExistingWatcher(String),
    WatcherNotRunning,
    PidFileNotFound,
    InvalidPidFileContent,
    StalePidFileRemoved(u32),
    ProcessTerminationFailed(String),
    DaemonModeNotSupported,
    ReceivedSigterm,
    ReceivedSigint,
    ReceivedCtrlC,
    SignalHandlerFailed(String),
}
