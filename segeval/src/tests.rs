#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use crate::{
        aggregate, evaluate, Curve, EvalError, EvaluationConfig, EvaluationSummary, MetricRecord,
        RecallGrid, SampleArrays,
    };

    fn sample(prediction: &[f32], ground_truth: &[bool]) -> SampleArrays {
        let binarized = prediction.iter().map(|&p| p >= 0.5).collect();
        SampleArrays::new(prediction.to_vec(), binarized, ground_truth.to_vec()).unwrap()
    }

    fn assert_no_nan(curve: &Curve) {
        for values in [curve.recall(), curve.precision(), curve.f1()] {
            assert!(values.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn test_perfect_separation() {
        let evaluation = evaluate(&sample(&[0.9, 0.8, 0.1, 0.2], &[true, true, false, false])).unwrap();
        let record = &evaluation.probabilistic;

        assert_eq!(record.f1score.mean(), 1.0);
        assert_eq!(record.precision.mean(), 1.0);
        assert_eq!(record.recall.mean(), 1.0);
        assert_eq!(record.iou.mean(), 1.0);

        // The best threshold separates 0.8 from 0.2
        let curve = &evaluation.curve;
        let threshold = curve.threshold().unwrap();
        assert_eq!(curve.recall(), &[0.0, 0.5, 1.0]);
        assert_eq!(threshold[2], f64::from(0.8f32));
        assert!(threshold.windows(2).all(|w| w[0] > w[1]));
        assert_relative_eq!(record.auc.mean(), 1.0);
    }

    #[test]
    fn test_no_positive_ground_truth() {
        let evaluation = evaluate(&sample(&[0.1, 0.2, 0.3, 0.4], &[false; 4])).unwrap();

        assert!(evaluation.curve.recall().iter().all(|&r| r == 0.0 || r == 1.0));
        assert!(evaluation.curve.f1().iter().all(|&f| f == 0.0));
        assert_no_nan(&evaluation.curve);
        for (_, value) in evaluation
            .probabilistic
            .means()
            .into_iter()
            .chain(evaluation.binarized.means())
        {
            assert!(value.is_finite());
        }
        assert_eq!(evaluation.probabilistic.f1score.mean(), 0.0);
        assert_eq!(evaluation.probabilistic.recall.mean(), 0.0);
    }

    #[test]
    fn test_all_zero_prediction() {
        let evaluation = evaluate(&sample(&[0.0; 6], &[false, true, true, false, false, false])).unwrap();

        assert_no_nan(&evaluation.curve);
        let record = &evaluation.probabilistic;
        assert!(record.precision.mean().is_finite());
        assert!(record.recall.mean().is_finite());
        // At threshold 0 every pixel is positive: recall 1, precision 2/6
        assert_relative_eq!(record.recall.mean(), 1.0);
        assert_relative_eq!(record.precision.mean(), 1.0 / 3.0);
    }

    #[test]
    fn test_all_false_binarized_prediction() {
        let input = SampleArrays::new(
            vec![0.3, 0.1, 0.2, 0.4],
            vec![false; 4],
            vec![false, true, true, false],
        )
        .unwrap();
        let evaluation = evaluate(&input).unwrap();
        let iou = evaluation.binarized.iou.mean();

        assert!(iou.is_finite());
        assert!((0.0..=1.0).contains(&iou));
    }

    #[test]
    fn test_deduplicated_recall_is_strictly_increasing() {
        let evaluation = evaluate(&sample(
            &[0.95, 0.9, 0.9, 0.7, 0.7, 0.5, 0.3, 0.3, 0.1, 0.0],
            &[false, true, false, true, true, false, true, false, false, true],
        ))
        .unwrap();
        let recall = evaluation.curve.recall();

        assert!(recall.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(recall[0], 0.0);
        assert_eq!(recall[recall.len() - 1], 1.0);
    }

    #[test]
    fn test_best_f1_is_first_maximum() {
        let evaluation = evaluate(&sample(
            &[0.9, 0.8, 0.7, 0.6, 0.5, 0.4],
            &[true, false, true, false, true, false],
        ))
        .unwrap();
        let curve = &evaluation.curve;
        let best = curve.f1_point().unwrap();
        let index = curve.recall().iter().position(|&r| r == best.recall).unwrap();

        let max = curve.f1().iter().copied().fold(f64::MIN, f64::max);
        assert_eq!(curve.f1()[index], max);
        assert!(curve.f1()[..index].iter().all(|&f| f < max));
        assert_eq!(evaluation.probabilistic.f1score.mean(), max);
    }

    #[test]
    fn test_auc_is_bounded() {
        let cases = [
            (vec![0.9, 0.8, 0.1, 0.2], vec![true, true, false, false]),
            (vec![0.1, 0.2, 0.9, 0.8], vec![true, true, false, false]),
            (vec![0.5, 0.5, 0.5, 0.5], vec![true, false, true, false]),
            (vec![0.3, 0.6, 0.2, 0.7, 0.9], vec![false, true, false, false, true]),
        ];
        for (prediction, ground_truth) in &cases {
            let auc = evaluate(&sample(prediction, ground_truth))
                .unwrap()
                .probabilistic
                .auc
                .mean();
            assert!((0.0..=1.0).contains(&auc), "auc {auc} out of bounds");
        }
    }

    #[test]
    fn test_aggregating_identical_curves() {
        let curve = evaluate(&sample(&[0.9, 0.6, 0.7, 0.2, 0.4], &[true, true, false, false, true]))
            .unwrap()
            .curve;
        let curves = vec![curve.clone(); 4];
        let result = aggregate(&curves, 50).unwrap();
        let single = aggregate(&[curve], 50).unwrap();

        assert_eq!(result.mean.precision(), single.mean.precision());
        assert_eq!(result.lower.precision(), result.mean.precision());
        assert_eq!(result.upper.precision(), result.mean.precision());
        assert_eq!(result.mean.bin_point(), single.mean.bin_point());
    }

    #[test]
    fn test_aggregating_on_curve_nodes_reproduces_curve() {
        let curve = Curve::new(vec![0.0, 0.5, 1.0], vec![1.0, 0.8, 0.4], None, None).unwrap();
        let grid = RecallGrid::from_points(curve.recall().to_vec()).unwrap();
        let result = aggregate(&[curve.clone(), curve.clone(), curve.clone()], grid).unwrap();

        assert_eq!(result.mean.recall(), curve.recall());
        assert_eq!(result.mean.precision(), curve.precision());
        assert_eq!(result.lower.precision(), curve.precision());
        assert_eq!(result.upper.precision(), curve.precision());
    }

    #[test]
    fn test_aggregate_two_curves_on_three_points() {
        let curves = [
            Curve::new(vec![0.0, 1.0], vec![1.0, 0.0], None, None).unwrap(),
            Curve::new(vec![0.0, 1.0], vec![0.5, 0.5], None, None).unwrap(),
        ];
        let grid = RecallGrid::from_points(vec![0.0, 0.5, 1.0]).unwrap();
        let result = aggregate(&curves, grid).unwrap();

        let mean = result.mean.precision();
        assert_relative_eq!(mean[0], 0.75);
        assert_relative_eq!(mean[1], 0.5);
        assert_relative_eq!(mean[2], 0.25);

        let std: Vec<f64> = result
            .upper
            .precision()
            .iter()
            .zip(mean)
            .map(|(upper, mean)| upper - mean)
            .collect();
        assert_relative_eq!(std[0], 0.25);
        assert_relative_eq!(std[1], 0.0);
        assert_relative_eq!(std[2], 0.25);
        assert_relative_eq!(result.lower.precision()[0], 0.5);
        assert_relative_eq!(result.lower.precision()[2], 0.0);
    }

    #[test]
    fn test_evaluate_then_aggregate_with_default_config() {
        let samples = [
            sample(&[0.9, 0.8, 0.1, 0.2], &[true, true, false, false]),
            sample(&[0.0, 0.0, 0.0, 0.0], &[true, false, false, false]),
            sample(&[0.1, 0.2, 0.3, 0.4], &[false; 4]),
            sample(&[0.6, 0.4, 0.7, 0.1], &[false, true, true, false]),
        ];
        let mut summary = EvaluationSummary::new();
        let mut curves = Vec::new();
        for (i, input) in samples.iter().enumerate() {
            let evaluation = evaluate(input).unwrap();
            summary.push(
                format!("sample_{i}"),
                &evaluation.probabilistic,
                &evaluation.binarized,
            );
            curves.push(evaluation.curve);
        }

        let config = EvaluationConfig::new();
        let result = aggregate(&curves, &config).unwrap();

        assert_eq!(summary.len(), 4);
        assert_eq!(result.mean.len(), config.grid_points);
        assert_no_nan(&result.mean);
        assert!(result.mean.f1_point().is_some());
        assert!(result.mean.bin_point().is_some());
        assert!(summary.probabilistic.mean("auc").is_some());
    }

    #[test]
    fn test_mismatched_lengths_fail_fast() {
        match SampleArrays::new(vec![0.5; 3], vec![true; 4], vec![true; 4]) {
            Err(EvalError::LengthMismatch { context, .. }) => {
                assert!(context.contains("probabilistic"));
            }
            _ => panic!("Expected LengthMismatch error"),
        }
    }
}
