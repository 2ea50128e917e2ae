// Still image endpoints: `jpg/image.cgi` and `bitmap/image.bmp`.
//
// Images are opaque bytes. The in-band error scan is skipped for them
// unless the camera labels the body `text/*`.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::client::VapixClient;
use crate::error::Error;
use crate::request::Request;

/// Image rotation in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum Rotation {
    #[strum(serialize = "0")]
    #[serde(rename = "0")]
    None,
    #[strum(serialize = "90")]
    #[serde(rename = "90")]
    Quarter,
    #[strum(serialize = "180")]
    #[serde(rename = "180")]
    Half,
    #[strum(serialize = "270")]
    #[serde(rename = "270")]
    ThreeQuarter,
}

/// Options understood by the still image endpoints.
///
/// Every field defaults to `None`, meaning "use the camera's setting".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// `WIDTHxHEIGHT` or a named resolution such as `CIF`.
    pub resolution: Option<String>,
    /// Video source on multi-sensor devices, 1-based.
    pub camera: Option<u8>,
    /// JPEG compression, 0-100.
    pub compression: Option<u8>,
    /// `false` requests a greyscale image.
    pub color: Option<bool>,
    /// Colour saturation, 0-100.
    pub color_level: Option<u8>,
    /// Clock overlay.
    pub clock: Option<bool>,
    /// Date overlay.
    pub date: Option<bool>,
    /// Text overlay; enables the overlay and sets its string.
    pub text: Option<String>,
    pub rotation: Option<Rotation>,
    pub mirror: Option<bool>,
    pub square_pixel: Option<bool>,
}

fn flag(value: Option<bool>) -> Option<u8> {
    value.map(u8::from)
}

fn percent(name: &'static str, value: Option<u8>) -> Result<Option<u8>, Error> {
    match value {
        Some(v) if v > 100 => Err(Error::InvalidOption {
            name,
            reason: format!("{v} is outside 0-100"),
        }),
        other => Ok(other),
    }
}

impl ImageOptions {
    pub fn validate(&self) -> Result<(), Error> {
        percent("compression", self.compression)?;
        percent("color_level", self.color_level)?;
        if self.camera == Some(0) {
            return Err(Error::InvalidOption {
                name: "camera",
                reason: "camera numbering starts at 1".into(),
            });
        }
        if let Some(res) = &self.resolution {
            if res.trim().is_empty() {
                return Err(Error::InvalidOption {
                    name: "resolution",
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Append the set options to `request` as query pairs.
    pub fn apply(&self, request: Request) -> Result<Request, Error> {
        self.validate()?;
        Ok(request
            .param_opt("resolution", self.resolution.as_deref())
            .param_opt("camera", self.camera)
            .param_opt("compression", self.compression)
            .param_opt("color", flag(self.color))
            .param_opt("colorlevel", self.color_level)
            .param_opt("clock", flag(self.clock))
            .param_opt("date", flag(self.date))
            .param_opt("text", self.text.as_ref().map(|_| 1))
            .param_opt("textstring", self.text.as_deref())
            .param_opt("rotation", self.rotation)
            .param_opt("mirror", flag(self.mirror))
            .param_opt("squarepixel", flag(self.square_pixel))
            .binary())
    }
}

impl VapixClient {
    /// Grab a JPEG snapshot.
    ///
    /// `GET jpg/image.cgi`
    pub fn image(&self, options: &ImageOptions) -> Result<Bytes, Error> {
        let request = options.apply(Request::cgi("jpg", "image"))?;
        debug!(?options, "fetching jpeg image");
        self.execute(&request)
    }

    /// Grab a bitmap snapshot.
    ///
    /// `GET bitmap/image.bmp`
    pub fn bitmap(&self, options: &ImageOptions) -> Result<Bytes, Error> {
        let request = options.apply(Request::new("bitmap", "image", "bmp"))?;
        debug!(?options, "fetching bitmap image");
        self.execute(&request)
    }
}
