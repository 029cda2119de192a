use crate::classification_client::interface::ClassificationResult;
use crate::emotion::Emotion;

/// A run is stressed when strictly more than this many frames carry a stress label.
pub const STRESS_THRESHOLD: usize = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressVerdict {
    pub stressed: bool,
    pub stress_count: usize,
    pub classified: usize,
}

impl StressVerdict {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let emotions = results.iter().filter_map(ClassificationResult::emotion);
        let (classified, stress_count) = emotions.fold((0, 0), |(classified, stress), emotion| {
            (classified + 1, stress + usize::from(emotion.is_stress()))
        });

        Self {
            stressed: stress_count > STRESS_THRESHOLD,
            stress_count,
            classified,
        }
    }

    pub fn message(&self) -> &'static str {
        match (self.stressed, self.classified) {
            (true, _) => "Stress detected! Take a break.",
            (false, 0) => "No stress detected (no frames were classified).",
            (false, _) => "No stress detected.",
        }
    }
}

/// Per-emotion counts in the display order of [`Emotion::ALL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionHistogram {
    counts: [usize; 7],
}

impl EmotionHistogram {
    pub fn from_results(results: &[ClassificationResult]) -> Self {
        let mut counts = [0; 7];
        for emotion in results.iter().filter_map(ClassificationResult::emotion) {
            if let Some(slot) = Emotion::ALL.iter().position(|e| *e == emotion) {
                counts[slot] += 1;
            }
        }
        Self { counts }
    }

    #[allow(dead_code)]
    pub fn count(&self, emotion: Emotion) -> usize {
        Emotion::ALL
            .iter()
            .position(|e| *e == emotion)
            .map_or(0, |slot| self.counts[slot])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, usize)> + '_ {
        Emotion::ALL.iter().copied().zip(self.counts.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification_client::interface::FrameLabel;

    fn results(stress: usize, calm: usize) -> Vec<ClassificationResult> {
        let stress_labels = [Emotion::Angry, Emotion::Disgust, Emotion::Fear, Emotion::Sad];
        let calm_labels = [Emotion::Happy, Emotion::Neutral];
        (0..stress)
            .map(|i| stress_labels[i % stress_labels.len()])
            .chain((0..calm).map(|i| calm_labels[i % calm_labels.len()]))
            .enumerate()
            .map(|(i, emotion)| ClassificationResult::classified(i, emotion))
            .collect()
    }

    #[test]
    fn test_threshold_is_strict() {
        assert!(!StressVerdict::from_results(&results(25, 25)).stressed);
        assert!(StressVerdict::from_results(&results(26, 24)).stressed);
    }

    #[test]
    fn test_monotonic_in_stress_count() {
        let mut flipped = false;
        for stress in 0..=50 {
            let verdict = StressVerdict::from_results(&results(stress, 50 - stress));
            assert_eq!(verdict.stress_count, stress);
            assert!(!(flipped && !verdict.stressed), "verdict flipped back at {}", stress);
            flipped |= verdict.stressed;
        }
        assert!(flipped);
    }

    #[test]
    fn test_thirty_of_fifty_is_stressed() {
        let verdict = StressVerdict::from_results(&results(30, 20));
        assert!(verdict.stressed);
        assert_eq!(verdict.message(), "Stress detected! Take a break.");
    }

    #[test]
    fn test_ten_of_fifty_is_not_stressed() {
        let verdict = StressVerdict::from_results(&results(10, 40));
        assert!(!verdict.stressed);
        assert_eq!(verdict.classified, 50);
        assert_eq!(verdict.message(), "No stress detected.");
    }

    #[test]
    fn test_empty_results() {
        let verdict = StressVerdict::from_results(&[]);
        assert_eq!(
            verdict,
            StressVerdict {
                stressed: false,
                stress_count: 0,
                classified: 0
            }
        );
    }

    #[test]
    fn test_unclassified_frames_do_not_count() {
        let mut all = results(26, 0);
        all[0].label = FrameLabel::Unclassified {
            reason: "Error in processing frame".to_string(),
        };

        let verdict = StressVerdict::from_results(&all);

        assert_eq!(verdict.stress_count, 25);
        assert_eq!(verdict.classified, 25);
        assert!(!verdict.stressed);
    }

    #[test]
    fn test_histogram_display_order() {
        let histogram = EmotionHistogram::from_results(&results(4, 3));

        let counts: Vec<_> = histogram.iter().collect();
        assert_eq!(
            counts,
            vec![
                (Emotion::Happy, 2),
                (Emotion::Sad, 1),
                (Emotion::Angry, 1),
                (Emotion::Fear, 1),
                (Emotion::Disgust, 1),
                (Emotion::Surprise, 0),
                (Emotion::Neutral, 1),
            ]
        );
        assert_eq!(histogram.count(Emotion::Happy), 2);
    }
}
