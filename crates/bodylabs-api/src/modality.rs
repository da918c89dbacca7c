//! Per-modality façades over [`Scan`].
//!
//! Each scan modality has a fixed input type and a fixed set of products,
//! each produced by a named pipeline. The tables below are the canonical
//! pipeline names; every accessor is memoized on its scan.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

use bodylabs_transport::{Client, Transport};
use serde_json::Value;

use crate::data::ScanUploadOptions;
use crate::effects::{Artifact, Scan};
use crate::error::Result;

/// One named product of a modality's pipelines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Product {
    /// Accessor name on the façade, e.g. `measurements`.
    pub accessor:      &'static str,
    pub service_type:  &'static str,
    pub artifact_type: &'static str,
}

impl Product {
    pub const fn new(
        accessor: &'static str,
        service_type: &'static str,
        artifact_type: &'static str,
    ) -> Self {
        Self {
            accessor,
            service_type,
            artifact_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Foot,
    Kinect,
    Laser,
    MultiSweep,
    Realsense,
}

impl Modality {
    pub const ALL: [Modality; 5] = [
        Modality::Foot,
        Modality::Kinect,
        Modality::Laser,
        Modality::MultiSweep,
        Modality::Realsense,
    ];

    /// `inputType` sent when creating an input of this modality.
    pub fn input_type(self) -> &'static str {
        match self {
            Modality::Foot => "footScan",
            Modality::Kinect => "kinectScan",
            Modality::Laser => "laserScan",
            Modality::MultiSweep => "multiSweepScan",
            Modality::Realsense => "ds4Scan",
        }
    }

    pub fn products(self) -> &'static [Product] {
        match self {
            Modality::Foot => FOOT_PRODUCTS,
            Modality::Kinect => KINECT_PRODUCTS,
            Modality::Laser => LASER_PRODUCTS,
            Modality::MultiSweep => MULTI_SWEEP_PRODUCTS,
            Modality::Realsense => REALSENSE_PRODUCTS,
        }
    }

    pub fn product(self, accessor: &str) -> Option<&'static Product> {
        self.products().iter().find(|p| p.accessor == accessor)
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Modality::Foot => "foot",
            Modality::Kinect => "kinect",
            Modality::Laser => "laser",
            Modality::MultiSweep => "multi-sweep",
            Modality::Realsense => "realsense",
        })
    }
}

macro_rules! modality_scan {
    (
        $(#[$meta:meta])*
        $name:ident, $modality:ident, $table:ident {
            $( $accessor:ident => ($service:literal, $artifact:literal), )+
        }
    ) => {
        pub const $table: &[Product] = &[
            $( Product::new(stringify!($accessor), $service, $artifact), )+
        ];

        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name<'c, T> {
            scan: Scan<'c, T>,
        }

        impl<'c, T: Transport> $name<'c, T> {
            pub const MODALITY: Modality = Modality::$modality;

            pub fn from_scan(scan: Scan<'c, T>) -> Self { Self { scan } }

            pub fn into_scan(self) -> Scan<'c, T> { self.scan }

            pub async fn find_by_id(client: &'c Client<T>, id: &str) -> Result<Self> {
                Scan::find_by_id(client, id).await.map(Self::from_scan)
            }

            /// Upload a raw scan and create an input of this modality.
            pub async fn by_uploading_scan(
                client: &'c Client<T>,
                path: impl AsRef<Path>,
                parameters: Value,
                options: &ScanUploadOptions,
            ) -> Result<Self> {
                let input_type = Self::MODALITY.input_type();
                Scan::by_uploading_scan(client, path, input_type, parameters, options)
                    .await
                    .map(Self::from_scan)
            }

            $(
                #[doc = concat!("`", $service, "` / `", $artifact, "`, requested once per scan.")]
                pub async fn $accessor(&mut self) -> Result<&mut Artifact<'c, T>> {
                    const PRODUCT: Product = Product::new(stringify!($accessor), $service, $artifact);
                    self.scan.cached_artifact(&PRODUCT).await
                }
            )+
        }

        impl<'c, T> Deref for $name<'c, T> {
            type Target = Scan<'c, T>;

            fn deref(&self) -> &Self::Target { &self.scan }
        }

        impl<'c, T> DerefMut for $name<'c, T> {
            fn deref_mut(&mut self) -> &mut Self::Target { &mut self.scan }
        }
    };
}

modality_scan! {
    /// Foot scans.
    FootScan, Foot, FOOT_PRODUCTS {
        measurements => ("footMeasurements", "valuesJson"),
        curves => ("footMeasurements", "curvesJson"),
        alignment => ("footAlignment", "normalizedAlignment"),
        normalized_scan => ("footAlignment", "normalizedScan"),
    }
}

modality_scan! {
    /// Kinect body scans.
    KinectScan, Kinect, KINECT_PRODUCTS {
        curves => ("KinectMeasurements", "curvesJson"),
        measurements => ("KinectMeasurements", "valuesJson"),
        measured_mesh => ("KinectMeasurements", "measuredMesh"),
        alignment => ("KinectAlignment", "quadAlignment"),
        alignment_t_pose => ("KinectAlignment", "quadAlignmentTPose"),
        alignment_scan_pose => ("KinectAlignment", "quadAlignmentScanPose"),
    }
}

modality_scan! {
    /// Laser body scans.
    LaserScan, Laser, LASER_PRODUCTS {
        measurements => ("ScanMeasurements", "valuesJson"),
        alignment => ("ScanAlignment", "finalizedAlignment"),
    }
}

modality_scan! {
    /// Multi-sweep scans captured as several passes.
    MultiSweepScan, MultiSweep, MULTI_SWEEP_PRODUCTS {
        alignment => ("MultiSweepAlignment", "canonicalAlignment"),
        curves => ("MultiSweepMeasurements", "curvesJson"),
        measurements => ("MultiSweepMeasurements", "valuesJson"),
        measured_mesh => ("MultiSweepMeasurements", "measuredMesh"),
        matched_body => ("MultiSweepMatchedBody", "matchInfoJson"),
        matched_body_m2m_leg => ("MultiSweepMatchedBody", "matchInfoJsonM2mLeg"),
    }
}

modality_scan! {
    /// RealSense (ds4) scans. The pipelines still carry their `ds4` names.
    RealsenseScan, Realsense, REALSENSE_PRODUCTS {
        fused_alignment => ("ds4Alignment", "canonicalAlignment"),
        curves => ("ds4Measurements", "curvesJson"),
        measurements => ("ds4Measurements", "valuesJson"),
        measured_mesh => ("ds4Measurements", "measuredMesh"),
        matched_body => ("ds4MatchedBody", "matchInfoJson"),
        matched_body_m2m_leg => ("ds4MatchedBody", "matchInfoJsonM2mLeg"),
    }
}
