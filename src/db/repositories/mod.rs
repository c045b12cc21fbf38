mod detections;
