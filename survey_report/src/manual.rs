/*!

This is the long-form manual for `survey_report` and `kuesioner`.

## Input

The questionnaire export is a table with one header row. The following columns
are required, in any order (other columns are ignored):

| Mata Kuliah | Pertanyaan    | Sangat Setuju | Setuju | Tidak Setuju | Sangat Tidak Setuju |
|-------------|---------------|---------------|--------|--------------|---------------------|
| Basis Data  | Materi jelas? | 40%           | 30%    | 20%          | 10%                 |
| ...         | ...           | ...           | ...    | ...          | ...                 |

The percentages may be written with or without a `%` sign. A percentage that
cannot be read stops the program: no report is written.

The same question may appear several times for a course. Only the first
occurrence is used.

Both CSV files and Excel (`.xlsx`) workbooks are accepted. In Excel
workbooks, numeric cells are read as percentages (`40` means 40%).

## File names

The name of the lecturer is read from the name of the input file. The
lecturer identifier is the part right before `STMT`:

```text
KL_Kuesioner_202312_MochammadFathurridhoHermantoSTMT (1).csv
                    ^^^^^^^^^^^^^^^^^^^^^^^^^^^^
```

It is printed as `Mochammad Fathurridho Hermanto` in the report. If the name
of the file does not follow this convention, the lecturer is `Unknown`.

The report is written as `KL_Kuesioner_202312_<identifier>_STMT (1).docx`.

## Report

For each course, in the order of the input:

* the name of the course
* the name of the lecturer and the number of respondents (left blank)
* the table of percentages, with the score `Nilai` of each question:
  `(4 × Sangat Setuju + 3 × Setuju + 2 × Tidak Setuju + 1 × Sangat Tidak Setuju) / 100`
* on a new page, the pie charts of the questions, 6 per page.

A question without any response gets an even pie chart marked as having no
responses. A chart that cannot be drawn is skipped, and the rest of the
report is still written.

*/
