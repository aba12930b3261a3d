use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use serde_json::Value;

use popthehood::capabilities::{
    CameraDevice, CapturedFrame, GeoError, Geolocator, MediaStream, Microphone, ModelEndpoint,
    ModelRequest, ModelResponse, Position, SpeechRecognizer, VideoFrameSource,
};
use popthehood::error::AppError;
use popthehood::VehicleInfo;

/// One scripted endpoint reply. `Fail` messages run through the boundary
/// classifier, exactly as a live transport error would.
pub enum Reply {
    Text(String),
    Grounded { text: String, chunks: Vec<Value> },
    Fail(String),
}

/// Scripted model endpoint recording every request it serves.
pub struct FakeEndpoint {
    replies: RefCell<VecDeque<Reply>>,
    requests: Rc<RefCell<Vec<ModelRequest>>>,
}

impl FakeEndpoint {
    pub fn new(replies: Vec<Reply>) -> (Self, Rc<RefCell<Vec<ModelRequest>>>) {
        let requests = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                replies: RefCell::new(replies.into()),
                requests: Rc::clone(&requests),
            },
            requests,
        )
    }
}

impl ModelEndpoint for FakeEndpoint {
    fn generate(&self, request: &ModelRequest) -> Result<ModelResponse, AppError> {
        self.requests.borrow_mut().push(request.clone());
        match self.replies.borrow_mut().pop_front() {
            Some(Reply::Text(text)) => Ok(ModelResponse {
                text,
                grounding_chunks: Vec::new(),
            }),
            Some(Reply::Grounded { text, chunks }) => Ok(ModelResponse {
                text,
                grounding_chunks: chunks,
            }),
            Some(Reply::Fail(message)) => Err(AppError::classify_upstream(message)),
            None => Err(AppError::Unknown("no scripted reply".to_string())),
        }
    }
}

pub struct FakeGeolocator {
    pub result: Result<Position, GeoError>,
}

impl FakeGeolocator {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            result: Ok(Position {
                latitude,
                longitude,
            }),
        }
    }

    pub fn failing(error: GeoError) -> Self {
        Self { result: Err(error) }
    }
}

impl Geolocator for FakeGeolocator {
    fn locate(&self, _timeout: Duration) -> Result<Position, GeoError> {
        self.result
    }
}

struct FakeVideoStream {
    frame: Option<CapturedFrame>,
    stopped: Rc<Cell<bool>>,
}

impl MediaStream for FakeVideoStream {
    fn stop(&mut self) {
        self.stopped.set(true);
    }
}

impl VideoFrameSource for FakeVideoStream {
    fn grab_frame(&mut self) -> Result<CapturedFrame, AppError> {
        self.frame
            .take()
            .ok_or_else(|| AppError::Unknown("frame grab failed".to_string()))
    }
}

/// Camera whose stream release is observable from the test.
pub struct FakeCamera {
    pub frame: Option<CapturedFrame>,
    pub stream_stopped: Rc<Cell<bool>>,
}

impl FakeCamera {
    pub fn with_frame(bytes: Vec<u8>, mime_type: &str) -> Self {
        Self {
            frame: Some(CapturedFrame {
                bytes,
                mime_type: mime_type.to_string(),
            }),
            stream_stopped: Rc::new(Cell::new(false)),
        }
    }

    pub fn broken() -> Self {
        Self {
            frame: None,
            stream_stopped: Rc::new(Cell::new(false)),
        }
    }
}

impl CameraDevice for FakeCamera {
    fn open(&mut self) -> Result<Box<dyn VideoFrameSource>, AppError> {
        Ok(Box::new(FakeVideoStream {
            frame: self.frame.take(),
            stopped: Rc::clone(&self.stream_stopped),
        }))
    }
}

struct FakeAudioStream {
    stops: Rc<Cell<u32>>,
}

impl MediaStream for FakeAudioStream {
    fn stop(&mut self) {
        self.stops.set(self.stops.get() + 1);
    }
}

/// Microphone tracking how many probe streams were opened and released.
pub struct FakeMicrophone {
    pub granted: bool,
    pub opens: Rc<Cell<u32>>,
    pub stops: Rc<Cell<u32>>,
}

impl FakeMicrophone {
    pub fn granted() -> Self {
        Self {
            granted: true,
            opens: Rc::new(Cell::new(0)),
            stops: Rc::new(Cell::new(0)),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            ..Self::granted()
        }
    }
}

impl Microphone for FakeMicrophone {
    fn open(&mut self) -> Result<Box<dyn MediaStream>, AppError> {
        if !self.granted {
            return Err(AppError::Permission(popthehood::error::Device::Microphone));
        }
        self.opens.set(self.opens.get() + 1);
        Ok(Box::new(FakeAudioStream {
            stops: Rc::clone(&self.stops),
        }))
    }
}

#[derive(Default)]
pub struct FakeRecognizer {
    pub started: u32,
    pub stopped: u32,
    pub fail_start: bool,
}

impl SpeechRecognizer for FakeRecognizer {
    fn start(&mut self) -> Result<(), AppError> {
        if self.fail_start {
            return Err(AppError::Unknown(
                "Speech recognition is not supported in this browser.".to_string(),
            ));
        }
        self.started += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped += 1;
    }
}

pub fn sample_vehicle() -> VehicleInfo {
    VehicleInfo {
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        year: "2014".to_string(),
        mileage: "120000".to_string(),
        engine: Some("1.8L I4".to_string()),
    }
}

/// A schema-conforming diagnostic response body.
pub fn diagnostic_body() -> String {
    serde_json::json!({
        "severity": "YELLOW",
        "analysisSummary": "Likely worn serpentine belt.",
        "mostLikelyCauses": [{
            "issue": "Worn serpentine belt",
            "probability": "High",
            "reasoning": "Squeal under load matches belt slip."
        }],
        "mechanicalExplanation": "The belt drives the alternator and pumps.",
        "recommendedActions": ["Inspect belt for glazing", "Check tensioner"],
        "costEstimate": { "parts": "$25-$60", "labor": "$80-$120", "total": "$105-$180" },
        "diyVsPro": {
            "canDiy": true,
            "explanation": "Belt replacement is a common DIY job.",
            "safetyWarnings": ["Disconnect the battery first"]
        },
        "urgency": {
            "timeline": "Within two weeks",
            "risksOfDelay": "Belt failure strands the vehicle."
        },
        "followUpQuestions": ["Does the noise change with AC on?"],
        "additionalContext": {
            "commonModelIssues": "Belt squeal is common on this engine.",
            "recallPotential": "None known.",
            "prevention": "Replace the belt every 60k miles."
        }
    })
    .to_string()
}

/// A schema-conforming tire response body at the given score.
pub fn tire_body(health_score: f64) -> String {
    serde_json::json!({
        "healthScore": health_score,
        "estimatedTreadDepth": "6/32\"",
        "condition": "Fair",
        "findings": ["Even wear across the tread"],
        "recommendation": "Rotate and re-check in 5k miles",
        "visualAnomalies": []
    })
    .to_string()
}
